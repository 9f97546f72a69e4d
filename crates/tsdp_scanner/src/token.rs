//! Lexical tokens produced by the lexer.

use serde::Serialize;
use tsdp_ast::{ParseNode, SyntaxKind};
use tsdp_core::text::{Position, TextSpan};

/// One scanned unit of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalToken {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// The exact source slice. Empty only for the end-of-file token.
    pub text: String,
    /// 1-based line and column of the first character.
    #[serde(skip)]
    pub position: Position,
    /// Byte span in the source text.
    #[serde(skip)]
    pub span: TextSpan,
}

impl LexicalToken {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, position: Position, span: TextSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
            span,
        }
    }

    /// The end-of-file token at the given location.
    pub fn end_of_file(position: Position, offset: u32) -> Self {
        Self::new(SyntaxKind::EndOfFileToken, "", position, TextSpan::new(offset, 0))
    }

    #[inline]
    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn is_newline(&self) -> bool {
        self.kind == SyntaxKind::NewLineToken
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == SyntaxKind::EndOfFileToken
    }

    /// Text used to name this token in diagnostics.
    pub fn display_text(&self) -> &str {
        match self.kind {
            SyntaxKind::EndOfFileToken => "end of file",
            SyntaxKind::NewLineToken => "newline",
            _ => &self.text,
        }
    }

    /// Promote this token to a parse-tree leaf.
    pub fn into_leaf(self) -> ParseNode {
        ParseNode::leaf(self.kind, self.text).with_position(self.position, self.span)
    }
}
