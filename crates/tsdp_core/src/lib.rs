//! tsdp_core: Core utilities for the tsdp declaration-file parser.
//!
//! Provides the source location types shared by the scanner, the parser and
//! the diagnostics.

pub mod text;

// Re-export commonly used types
pub use text::{Position, TextPos, TextSpan};
