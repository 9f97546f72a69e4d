//! tsdp_ast: Parse tree definitions for the declaration-file parser.
//!
//! This module defines the SyntaxKind enum (token and node kinds), the
//! ParseNode tree type and a visitor for walking it.

pub mod node;
pub mod syntax_kind;
pub mod visitor;

// Re-export key types
pub use node::{demote_to_identifier, ParseNode};
pub use syntax_kind::SyntaxKind;
pub use visitor::{walk, Visitor};
