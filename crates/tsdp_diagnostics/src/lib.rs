//! tsdp_diagnostics: Syntax errors and the diagnostic message catalog.
//!
//! Parsing is fail-fast: the first problem found in a file becomes a single
//! [`SyntaxError`] that unwinds to the caller. Its `Display` form is the
//! external failure surface, `<file>:<line>:<column> Error: <message>`.

use std::fmt;

use miette::{LabeledSpan, SourceSpan};
use tsdp_core::text::{Position, TextSpan};

/// Result type for lexing and parsing operations.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// The class of a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    // Lexical
    UnterminatedComment,
    UnterminatedString,
    IllegalNewlineInString,
    // Stream
    UnexpectedEndOfFile,
    // Grammar
    UnexpectedToken,
    UnexpectedElement,
    UnexpectedTerminator,
    DefaultsMustTrail,
    ReadonlyOnMethod,
    UnbalancedParentheses,
    ParameterInitializer,
    NestingTooDeep,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A diagnostic message template with a code and the kind it reports.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1001, 1120).
    pub code: u32,
    /// The error kind this message reports.
    pub kind: SyntaxErrorKind,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A fatal syntax error with its source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{file}:{position} Error: {message}")]
pub struct SyntaxError {
    /// The file the error was found in.
    pub file: String,
    /// 1-based line and column of the error.
    pub position: Position,
    /// Byte span of the offending token (or construct start).
    pub span: TextSpan,
    /// The class of the error.
    pub kind: SyntaxErrorKind,
    /// The diagnostic code.
    pub code: u32,
    /// The resolved message text.
    pub message: String,
}

impl SyntaxError {
    /// Create a syntax error from a catalog message.
    pub fn new(
        file: &str,
        position: Position,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: file.to_string(),
            position,
            span,
            kind: message.kind,
            code: message.code,
            message: format_message(message.message, args),
        }
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }
}

impl miette::Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("TSD{}", self.code)))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = SourceSpan::new(
            (self.span.start as usize).into(),
            self.span.length as usize,
        );
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.kind.to_string()),
            span,
        ))))
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $kind:ident, $msg:expr) => {
            DiagnosticMessage { code: $code, kind: SyntaxErrorKind::$kind, message: $msg }
        };
    }

    // ========================================================================
    // Lexer errors (1000-1009)
    // ========================================================================
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(1001, UnterminatedComment, "Did you forget to close the block comment? '*/' expected.");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, UnterminatedString, "Unterminated string literal.");
    pub const UNEXPECTED_NEWLINE_IN_STRING: DiagnosticMessage = diag!(1003, IllegalNewlineInString, "Unexpected newline in string literal.");

    // ========================================================================
    // Token stream errors (1010-1019)
    // ========================================================================
    pub const UNEXPECTED_END_OF_FILE: DiagnosticMessage = diag!(1010, UnexpectedEndOfFile, "Unexpected end of file, expected {0}.");

    // ========================================================================
    // Grammar errors (1100-1199)
    // ========================================================================
    pub const _0_EXPECTED_GOT_1: DiagnosticMessage = diag!(1100, UnexpectedToken, "Expected {0}, got '{1}'.");
    pub const EXPECTED_DECLARE_AT_GLOBAL_LEVEL: DiagnosticMessage = diag!(1101, UnexpectedElement, "Expected a 'declare' keyword at global namespace level, got '{0}'.");
    pub const EXPECTED_DECLARATION: DiagnosticMessage = diag!(1102, UnexpectedElement, "Expected a declaration, got '{0}'.");
    pub const EXPECTED_TERMINATOR: DiagnosticMessage = diag!(1110, UnexpectedTerminator, "Expected a ';' or a newline at the end of the declaration, got '{0}'.");
    pub const EXPECTED_MEMBER_TERMINATOR: DiagnosticMessage = diag!(1111, UnexpectedTerminator, "Expected a ';', ',' or a newline after the member, got '{0}'.");
    pub const GENERIC_DEFAULTS_MUST_TRAIL: DiagnosticMessage = diag!(1120, DefaultsMustTrail, "Generic parameter '{0}' needs a default value because a previous parameter has one.");
    pub const READONLY_ON_METHOD: DiagnosticMessage = diag!(1121, ReadonlyOnMethod, "'readonly' can only be applied to properties, not methods.");
    pub const UNBALANCED_PARENTHESES: DiagnosticMessage = diag!(1122, UnbalancedParentheses, "No matching ')' for this '('.");
    pub const PARAMETER_INITIALIZER_NOT_ALLOWED: DiagnosticMessage = diag!(1123, ParameterInitializer, "Parameter '{0}' cannot have a default value in a declaration.");
    pub const NESTING_TOO_DEEP: DiagnosticMessage = diag!(1130, NestingTooDeep, "Declarations are nested deeper than the maximum of {0}.");
}
