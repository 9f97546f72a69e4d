//! The lexical token stream.
//!
//! A cursor over the lexer's pre-computed token list. Peeking never moves the
//! cursor, so any lookahead can be repeated from the same place. Both `peek`
//! and `next` take a `skip_newlines` flag: grammar decisions pass `true` and
//! never see line structure, while the statement-terminator probe passes
//! `false` to see the very next token, newline included.

use tsdp_ast::syntax_kind::SyntaxKind;
use tsdp_core::text::{Position, TextSpan};
use tsdp_diagnostics::{messages, DiagnosticMessage, ParseResult, SyntaxError};
use tsdp_scanner::{Lexer, LexerOptions, LexicalToken};

pub struct TokenStream {
    file_name: String,
    /// Always ends with exactly one end-of-file token.
    tokens: Vec<LexicalToken>,
    /// Index of the next unconsumed token.
    cursor: usize,
}

impl TokenStream {
    /// Wrap an already scanned token list.
    pub fn new(file_name: &str, mut tokens: Vec<LexicalToken>) -> Self {
        if !tokens.last().is_some_and(LexicalToken::is_eof) {
            let (position, offset) = tokens
                .last()
                .map(|t| {
                    let mut end = t.position;
                    end.advance_str(&t.text);
                    (end, t.span.end())
                })
                .unwrap_or((Position::start(), 0));
            tokens.push(LexicalToken::end_of_file(position, offset));
        }
        Self {
            file_name: file_name.to_string(),
            tokens,
            cursor: 0,
        }
    }

    /// Scan `source` and wrap the resulting tokens.
    pub fn from_source(file_name: &str, source: &str, options: LexerOptions) -> ParseResult<Self> {
        let tokens = Lexer::with_options(file_name, source, options).tokenize()?;
        Ok(Self::new(file_name, tokens))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    // ========================================================================
    // Cursor movement
    // ========================================================================

    /// Index of the token `look_ahead` places past the cursor.
    ///
    /// Never moves past the end-of-file token.
    fn index_of(&self, look_ahead: usize, skip_newlines: bool) -> usize {
        let last = self.tokens.len() - 1;
        let mut index = self.cursor;
        let mut remaining = look_ahead;
        loop {
            if skip_newlines {
                while index < last && self.tokens[index].is_newline() {
                    index += 1;
                }
            }
            if remaining == 0 || index >= last {
                return index.min(last);
            }
            remaining -= 1;
            index += 1;
        }
    }

    /// The token `look_ahead` places ahead, without consuming anything.
    pub fn peek(&self, look_ahead: usize, skip_newlines: bool) -> &LexicalToken {
        &self.tokens[self.index_of(look_ahead, skip_newlines)]
    }

    /// Kind of the significant token `look_ahead` places ahead.
    #[inline]
    pub fn peek_kind(&self, look_ahead: usize) -> SyntaxKind {
        self.peek(look_ahead, true).kind
    }

    /// Whether the next significant token has the given kind.
    #[inline]
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind(0) == kind
    }

    /// The raw token right after the next significant token. A newline
    /// between the two is returned as the newline.
    pub fn peek_adjacent(&self) -> &LexicalToken {
        let index = self.index_of(0, true);
        &self.tokens[(index + 1).min(self.tokens.len() - 1)]
    }

    /// Consume and return the current token.
    ///
    /// At end of file the end-of-file token is returned again.
    pub fn next(&mut self, skip_newlines: bool) -> LexicalToken {
        let index = self.index_of(0, skip_newlines);
        let token = self.tokens[index].clone();
        if !token.is_eof() {
            self.cursor = index + 1;
        } else {
            self.cursor = index;
        }
        token
    }

    /// Consume the next significant token only if it has the given kind.
    pub fn next_if(&mut self, kind: SyntaxKind) -> Option<LexicalToken> {
        if self.at(kind) {
            Some(self.next(true))
        } else {
            None
        }
    }

    /// Consume a token of the given kind or fail naming what was expected.
    pub fn expect(&mut self, kind: SyntaxKind) -> ParseResult<LexicalToken> {
        self.expect_one_of(&[kind], &kind.describe())
    }

    /// Consume a token of any of the given kinds, or fail with `expected`.
    pub fn expect_one_of(&mut self, kinds: &[SyntaxKind], expected: &str) -> ParseResult<LexicalToken> {
        if kinds.contains(&self.peek_kind(0)) {
            Ok(self.next(true))
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Significant tokens from the cursor onwards, ending with end of file.
    pub fn lookahead(&self) -> impl Iterator<Item = &LexicalToken> {
        self.tokens[self.cursor..].iter().filter(|t| !t.is_newline())
    }

    pub fn is_at_end(&self) -> bool {
        self.peek(0, true).is_eof()
    }

    /// Position of the next significant token.
    pub fn position(&self) -> Position {
        self.peek(0, true).position
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// An error located at the next significant (not yet consumed) token.
    pub fn error(&self, message: &DiagnosticMessage, args: &[&str]) -> SyntaxError {
        self.error_at_token(self.peek(0, true), message, args)
    }

    pub fn error_at_token(&self, token: &LexicalToken, message: &DiagnosticMessage, args: &[&str]) -> SyntaxError {
        self.error_at(token.position, token.span, message, args)
    }

    pub fn error_at(
        &self,
        position: Position,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> SyntaxError {
        SyntaxError::new(&self.file_name, position, span, message, args)
    }

    /// "Expected X, got Y" for the next significant token, or an
    /// unexpected-end-of-file error when the stream is exhausted.
    pub fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.peek(0, true);
        if token.is_eof() {
            self.error_at_token(token, &messages::UNEXPECTED_END_OF_FILE, &[expected])
        } else {
            self.error_at_token(token, &messages::_0_EXPECTED_GOT_1, &[expected, token.display_text()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsdp_diagnostics::SyntaxErrorKind;

    fn stream(source: &str) -> TokenStream {
        TokenStream::from_source("test.d.ts", source, LexerOptions::default()).unwrap()
    }

    #[test]
    fn test_peek_does_not_advance() {
        let s = stream("a b");
        assert_eq!(s.peek(0, true).text, "a");
        assert_eq!(s.peek(0, true).text, "a");
        assert_eq!(s.peek(1, true).text, "b");
        assert!(s.peek(2, true).is_eof());
        assert!(s.peek(9, true).is_eof());
    }

    #[test]
    fn test_newlines_are_skipped_and_not_counted() {
        let s = stream("\n\na\n\nb");
        assert_eq!(s.peek(0, true).text, "a");
        assert_eq!(s.peek(1, true).text, "b");
        assert!(s.peek(0, false).is_newline());
    }

    #[test]
    fn test_next_without_skipping_returns_newline() {
        let mut s = stream("a\nb");
        assert_eq!(s.next(true).text, "a");
        assert!(s.next(false).is_newline());
        assert_eq!(s.next(false).text, "b");
        assert!(s.next(false).is_eof());
        assert!(s.next(true).is_eof());
    }

    #[test]
    fn test_peek_adjacent_sees_newlines() {
        let s = stream("\na b\nc");
        assert_eq!(s.peek_adjacent().text, "b");
        let s = stream("b\nc");
        assert!(s.peek_adjacent().is_newline());
        let s = stream("c");
        assert!(s.peek_adjacent().is_eof());
    }

    #[test]
    fn test_next_if() {
        let mut s = stream("; x");
        assert!(s.next_if(SyntaxKind::ColonToken).is_none());
        assert!(s.next_if(SyntaxKind::SemicolonToken).is_some());
        assert_eq!(s.peek(0, true).text, "x");
    }

    #[test]
    fn test_error_cites_current_token() {
        let mut s = stream("a\n  b");
        s.next(true);
        let err = s.error(&messages::_0_EXPECTED_GOT_1, &["':'", "b"]);
        assert_eq!((err.line(), err.column()), (2, 3));
    }

    #[test]
    fn test_expect_at_end_of_file() {
        let mut s = stream("");
        let err = s.expect(SyntaxKind::OpenBraceToken).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedEndOfFile);
        assert_eq!(err.message, "Unexpected end of file, expected '{'.");
    }

    #[test]
    fn test_expect_wrong_token_does_not_consume() {
        let mut s = stream("x");
        let err = s.expect(SyntaxKind::ColonToken).unwrap_err();
        assert_eq!(err.message, "Expected ':', got 'x'.");
        assert_eq!(s.peek(0, true).text, "x");
    }

    #[test]
    fn test_lookahead_skips_newlines() {
        let s = stream("(\n)\n=>");
        let kinds: Vec<_> = s.lookahead().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::OpenParenToken,
                SyntaxKind::CloseParenToken,
                SyntaxKind::EqualsGreaterThanToken,
                SyntaxKind::EndOfFileToken,
            ]
        );
    }

    #[test]
    fn test_missing_end_of_file_is_appended() {
        let s = TokenStream::new("t", Vec::new());
        assert!(s.is_at_end());
    }
}
