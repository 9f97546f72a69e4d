//! Character classification used by the lexer.
//!
//! The grammar is ASCII-oriented: identifiers and numbers are ASCII only,
//! while strings and comments may hold any UTF-8 text.

pub const LINE_FEED: u8 = b'\n';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const SINGLE_QUOTE: u8 = b'\'';
pub const BACKSLASH: u8 = b'\\';
pub const SLASH: u8 = b'/';
pub const ASTERISK: u8 = b'*';
pub const DOLLAR_SIGN: u8 = b'$';
pub const UNDERSCORE: u8 = b'_';

/// Check if a character is whitespace other than a line feed.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\r'
            | '\u{000B}' // vertical tab
            | '\u{000C}' // form feed
            | '\u{00A0}' // no-break space
            | '\u{2000}'..='\u{200A}' // various spaces
            | '\u{202F}' // narrow no-break space
            | '\u{3000}' // ideographic space
            | '\u{FEFF}' // BOM / zero-width no-break space
    )
}

/// Check if a byte can start an identifier.
#[inline]
pub fn is_identifier_start(byte: u8, allow_dollar: bool) -> bool {
    byte.is_ascii_alphabetic() || byte == UNDERSCORE || (allow_dollar && byte == DOLLAR_SIGN)
}

/// Check if a byte can continue an identifier.
#[inline]
pub fn is_identifier_part(byte: u8, allow_dollar: bool) -> bool {
    byte.is_ascii_alphanumeric() || byte == UNDERSCORE || (allow_dollar && byte == DOLLAR_SIGN)
}

/// Check if a byte is a quote that opens a string literal.
#[inline]
pub fn is_quote(byte: u8) -> bool {
    byte == DOUBLE_QUOTE || byte == SINGLE_QUOTE
}
