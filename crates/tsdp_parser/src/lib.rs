//! tsdp_parser: Recursive descent parser for TypeScript declaration files.
//!
//! Walks the scanner's tokens through a [`TokenStream`] and builds a
//! [`ParseNode`] tree rooted at a File node. The first syntax error ends the
//! parse.

mod parser;
mod stream;
mod utilities;

use std::path::Path;

use tsdp_ast::ParseNode;
use tsdp_diagnostics::{ParseResult, SyntaxError};

pub use parser::{Parser, ParserOptions, DEFAULT_MAX_DEPTH};
pub use stream::TokenStream;

/// Failure to load or parse a file from disk.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Parse in-memory source text with the default options.
pub fn parse_source(file_name: &str, source: &str) -> ParseResult<ParseNode> {
    parse_source_with_options(file_name, source, ParserOptions::default())
}

pub fn parse_source_with_options(
    file_name: &str,
    source: &str,
    options: ParserOptions,
) -> ParseResult<ParseNode> {
    Parser::with_options(file_name, source, options)?.parse_file()
}

/// Read a whole file into memory and parse it.
///
/// Diagnostics name the file by the path as given.
pub fn parse_file(path: impl AsRef<Path>, options: ParserOptions) -> Result<ParseNode, FileError> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| FileError::Io {
        path: name.clone(),
        source,
    })?;
    Ok(parse_source_with_options(&name, &source, options)?)
}
