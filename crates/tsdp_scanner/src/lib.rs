//! tsdp_scanner: Lexer for TypeScript declaration files.
//!
//! Converts raw source text into the complete, ordered list of lexical
//! tokens for a file, terminated by exactly one end-of-file token:
//! - keywords, classified from identifiers through a fixed table
//! - identifiers, string literals and unsigned integer literals
//! - punctuation, longest symbol first
//! - significant newlines (other whitespace and comments are dropped)

mod char_codes;
mod scanner;
mod token;

pub use scanner::{tokenize, Lexer, LexerOptions};
pub use token::LexicalToken;
