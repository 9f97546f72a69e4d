//! The declaration-file lexer.
//!
//! Scans the whole input up front into a token list. At each position the
//! classification order is: whitespace (a line feed is its own token), line
//! comment, block comment, identifier or keyword, string literal, number,
//! then punctuation. Anything else becomes a one-character `Unknown` token.

use memchr::{memchr, memmem};
use tracing::debug;
use tsdp_ast::syntax_kind::SyntaxKind;
use tsdp_core::text::{Position, TextPos, TextSpan};
use tsdp_diagnostics::{messages, DiagnosticMessage, ParseResult, SyntaxError};

use crate::char_codes::*;
use crate::token::LexicalToken;

/// Options controlling how identifiers are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// Whether `$` may start and continue identifiers.
    pub allow_dollar_in_identifiers: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            allow_dollar_in_identifiers: true,
        }
    }
}

/// Scan `source` into tokens with the default options.
pub fn tokenize(file_name: &str, source: &str) -> ParseResult<Vec<LexicalToken>> {
    Lexer::new(file_name, source).tokenize()
}

/// The lexer converts declaration source text into tokens.
pub struct Lexer<'s> {
    file_name: String,
    /// The source text being scanned.
    text: &'s str,
    /// Current byte offset in the text.
    pos: usize,
    /// Line and column of `pos`.
    position: Position,
    options: LexerOptions,
    tokens: Vec<LexicalToken>,
}

impl<'s> Lexer<'s> {
    /// Create a new lexer for the given source text.
    pub fn new(file_name: &str, text: &'s str) -> Self {
        Self::with_options(file_name, text, LexerOptions::default())
    }

    pub fn with_options(file_name: &str, text: &'s str, options: LexerOptions) -> Self {
        Self {
            file_name: file_name.to_string(),
            text,
            pos: 0,
            position: Position::start(),
            options,
            tokens: Vec::new(),
        }
    }

    /// Scan the whole input.
    ///
    /// The returned list always ends with exactly one end-of-file token.
    pub fn tokenize(mut self) -> ParseResult<Vec<LexicalToken>> {
        while !self.is_eof() {
            self.scan_token()?;
        }
        self.tokens
            .push(LexicalToken::end_of_file(self.position, self.pos as TextPos));
        debug!(file = %self.file_name, tokens = self.tokens.len(), "scanned");
        Ok(self.tokens)
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn bytes(&self) -> &'s [u8] {
        self.text.as_bytes()
    }

    /// Whether we've reached the end of the text.
    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Look at the byte at position pos + offset.
    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    /// The character at the current position.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Consume `len` bytes, advancing the line/column position.
    fn advance(&mut self, len: usize) {
        let end = (self.pos + len).min(self.text.len());
        self.position.advance_str(&self.text[self.pos..end]);
        self.pos = end;
    }

    fn error_at(
        &self,
        position: Position,
        start: usize,
        len: usize,
        message: &DiagnosticMessage,
    ) -> SyntaxError {
        SyntaxError::new(
            &self.file_name,
            position,
            TextSpan::new(start as TextPos, len as TextPos),
            message,
            &[],
        )
    }

    /// Emit the token spanning `start..self.pos`, which began at `position`.
    fn emit(&mut self, kind: SyntaxKind, start: usize, position: Position) {
        let span = TextSpan::from_bounds(start as TextPos, self.pos as TextPos);
        let text = &self.text[span.to_range()];
        self.tokens.push(LexicalToken::new(kind, text, position, span));
    }

    fn scan_token(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let position = self.position;
        let byte = self.bytes()[self.pos];

        if byte == LINE_FEED {
            self.advance(1);
            self.emit(SyntaxKind::NewLineToken, start, position);
            return Ok(());
        }
        if let Some(ch) = self.current_char().filter(|c| is_white_space_single_line(*c)) {
            self.advance(ch.len_utf8());
            return Ok(());
        }
        if byte == SLASH && self.byte_at(1) == Some(SLASH) {
            self.skip_line_comment();
            return Ok(());
        }
        if byte == SLASH && self.byte_at(1) == Some(ASTERISK) {
            return self.skip_block_comment();
        }

        let kind = if is_identifier_start(byte, self.options.allow_dollar_in_identifiers) {
            self.scan_identifier()
        } else if is_quote(byte) {
            self.scan_string_literal(byte)?
        } else if byte.is_ascii_digit() {
            self.scan_number()
        } else {
            self.scan_punctuation()
        };
        self.emit(kind, start, position);
        Ok(())
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    /// Skip to the end of the line. The line feed itself is left for the
    /// next token.
    fn skip_line_comment(&mut self) {
        let len = memchr(LINE_FEED, &self.bytes()[self.pos..]).unwrap_or(self.text.len() - self.pos);
        self.advance(len);
    }

    fn skip_block_comment(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let position = self.position;
        match memmem::find(&self.bytes()[self.pos + 2..], b"*/") {
            Some(offset) => {
                self.advance(offset + 4);
                Ok(())
            }
            None => Err(self.error_at(position, start, 2, &messages::UNTERMINATED_COMMENT)),
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        let allow_dollar = self.options.allow_dollar_in_identifiers;
        let len = self.bytes()[start..]
            .iter()
            .take_while(|b| is_identifier_part(**b, allow_dollar))
            .count();
        self.advance(len);
        SyntaxKind::from_keyword(&self.text[start..self.pos]).unwrap_or(SyntaxKind::Identifier)
    }

    /// Scan a quoted string. The token text keeps its quotes and escapes.
    fn scan_string_literal(&mut self, quote: u8) -> ParseResult<SyntaxKind> {
        let start = self.pos;
        let position = self.position;
        self.advance(1); // opening quote
        loop {
            let Some(byte) = self.byte_at(0) else {
                return Err(self.error_at(
                    position,
                    start,
                    self.pos - start,
                    &messages::UNTERMINATED_STRING_LITERAL,
                ));
            };
            match byte {
                b if b == quote => {
                    self.advance(1);
                    return Ok(SyntaxKind::StringLiteral);
                }
                LINE_FEED => {
                    return Err(self.error_at(
                        self.position,
                        self.pos,
                        1,
                        &messages::UNEXPECTED_NEWLINE_IN_STRING,
                    ));
                }
                BACKSLASH => {
                    // The escaped character never terminates the string.
                    let escaped = self.text[self.pos + 1..].chars().next().map_or(0, char::len_utf8);
                    self.advance(1 + escaped);
                }
                _ => {
                    let len = self.current_char().map_or(1, char::len_utf8);
                    self.advance(len);
                }
            }
        }
    }

    /// Scan a run of decimal digits. There are no signs, fractions or exponents.
    fn scan_number(&mut self) -> SyntaxKind {
        let len = self.bytes()[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        self.advance(len);
        SyntaxKind::NumericLiteral
    }

    fn scan_punctuation(&mut self) -> SyntaxKind {
        let rest = &self.text[self.pos..];
        if let Some((symbol, kind)) = SyntaxKind::PUNCTUATION
            .iter()
            .find(|(symbol, _)| rest.starts_with(*symbol))
        {
            self.advance(symbol.len());
            return *kind;
        }
        let len = self.current_char().map_or(1, char::len_utf8);
        self.advance(len);
        SyntaxKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsdp_diagnostics::SyntaxErrorKind;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        tokenize("test.d.ts", source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_exactly_one_end_of_file() {
        assert_eq!(kinds(""), vec![SyntaxKind::EndOfFileToken]);
        let tokens = kinds("a b");
        assert_eq!(tokens.iter().filter(|k| **k == SyntaxKind::EndOfFileToken).count(), 1);
        assert_eq!(tokens.last(), Some(&SyntaxKind::EndOfFileToken));
    }

    #[test]
    fn test_dollar_option() {
        let options = LexerOptions { allow_dollar_in_identifiers: false };
        let tokens = Lexer::with_options("t", "$a", options).tokenize().unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::Unknown);
        assert_eq!(tokens[0].text, "$");
        assert_eq!(tokens[1].kind, SyntaxKind::Identifier);

        let tokens = tokenize("t", "$a").unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[0].text, "$a");
    }

    #[test]
    fn test_block_comment_at_end_of_input() {
        let err = tokenize("t", "a /*").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedComment);
        assert_eq!(err.position, Position::new(1, 3));
    }

    #[test]
    fn test_slash_star_slash_is_not_closed() {
        let err = tokenize("t", "/*/").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedComment);
    }

    #[test]
    fn test_unknown_multibyte_character() {
        let tokens = tokenize("t", "é").unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::Unknown);
        assert_eq!(tokens[0].text, "é");
        assert_eq!(tokens[1].position, Position::new(1, 2));
    }
}
