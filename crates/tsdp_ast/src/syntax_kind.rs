//! SyntaxKind enum - all lexical token kinds and grammar node kinds.
//!
//! Lexical kinds come first; every one of them is a terminal and can appear
//! in the tree as a promoted leaf. Grammar kinds follow and are always
//! structural.

use serde::{Deserialize, Serialize};

/// The kind of a lexical token or of a parse-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown,
    EndOfFileToken,
    NewLineToken,

    // Literals and names
    Identifier,
    StringLiteral,
    NumericLiteral,

    // Reserved words
    ClassKeyword,
    ConstKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FunctionKeyword,
    ImportKeyword,
    InKeyword,
    TypeOfKeyword,
    /// `var` and `let`.
    VarKeyword,

    // Contextual keywords
    InterfaceKeyword,
    KeyOfKeyword,
    TypeKeyword,
    ImplementsKeyword,
    /// `public`, `protected` and `private`.
    VisibilityKeyword,
    StaticKeyword,
    ReadonlyKeyword,
    AsKeyword,
    IsKeyword,
    FromKeyword,
    DeclareKeyword,
    /// `module` and `namespace`.
    ModuleKeyword,
    RequireKeyword,
    ConstructorKeyword,

    // Punctuation
    EqualsGreaterThanToken,
    DotDotDotToken,
    ColonToken,
    SemicolonToken,
    DotToken,
    CommaToken,
    SlashToken,
    BackslashToken,
    QuestionToken,
    AsteriskToken,
    OpenParenToken,
    CloseParenToken,
    OpenBraceToken,
    CloseBraceToken,
    OpenBracketToken,
    CloseBracketToken,
    EqualsToken,
    BarToken,
    AmpersandToken,
    /// `<`, opens a generic parameter or argument list.
    LessThanToken,
    /// `>`, closes the list opened by [`SyntaxKind::LessThanToken`].
    GreaterThanToken,

    // ========================================================================
    // Grammar productions
    // ========================================================================
    File,
    FileElement,
    Namespace,
    NamespaceElement,
    Import,
    ImportSpecifier,
    Export,
    ExportSpecifier,
    Enum,
    EnumMember,
    Class,
    ClassElement,
    GenericParameterPack,
    GenericParameter,
    ObjectCallable,
    Function,
    Constructor,
    ParameterPack,
    Parameter,
    MapObject,
    Variable,
    GlobalVariable,
    GlobalFunction,
    TypeDef,
    FunctionTypePredicate,
    TypeGroup,
    UnionType,
    IntersectionType,
    Type,
    LambdaType,
    AnonymousType,
    DotId,
    ElementKey,
}

impl SyntaxKind {
    /// Whether nodes of this kind are terminals (promoted leaves carrying text).
    ///
    /// This is a fixed classification: it does not depend on whether a node
    /// happens to have children.
    pub fn is_terminal(self) -> bool {
        self < SyntaxKind::File
    }

    /// Whether this kind is produced by a grammar rule.
    pub fn is_node(self) -> bool {
        !self.is_terminal()
    }

    /// Whether this kind was classified from an identifier-shaped word.
    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::ClassKeyword && self <= SyntaxKind::ConstructorKeyword
    }

    /// Whether this is a hard reserved word.
    ///
    /// Reserved words keep their keyword kind in every position; the other
    /// keywords are contextual and may be demoted to identifiers.
    pub fn is_reserved_word(self) -> bool {
        self >= SyntaxKind::ClassKeyword && self <= SyntaxKind::VarKeyword
    }

    pub fn is_literal(self) -> bool {
        matches!(self, SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral)
    }

    /// Look up a keyword SyntaxKind from text.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "class" => Some(SyntaxKind::ClassKeyword),
            "interface" => Some(SyntaxKind::InterfaceKeyword),
            "constructor" => Some(SyntaxKind::ConstructorKeyword),
            "const" => Some(SyntaxKind::ConstKeyword),
            "enum" => Some(SyntaxKind::EnumKeyword),
            "export" => Some(SyntaxKind::ExportKeyword),
            "extends" => Some(SyntaxKind::ExtendsKeyword),
            "function" => Some(SyntaxKind::FunctionKeyword),
            "import" => Some(SyntaxKind::ImportKeyword),
            "in" => Some(SyntaxKind::InKeyword),
            "typeof" => Some(SyntaxKind::TypeOfKeyword),
            "type" => Some(SyntaxKind::TypeKeyword),
            "keyof" => Some(SyntaxKind::KeyOfKeyword),
            "var" | "let" => Some(SyntaxKind::VarKeyword),
            "implements" => Some(SyntaxKind::ImplementsKeyword),
            "private" | "protected" | "public" => Some(SyntaxKind::VisibilityKeyword),
            "static" => Some(SyntaxKind::StaticKeyword),
            "readonly" => Some(SyntaxKind::ReadonlyKeyword),
            "as" => Some(SyntaxKind::AsKeyword),
            "is" => Some(SyntaxKind::IsKeyword),
            "from" => Some(SyntaxKind::FromKeyword),
            "declare" => Some(SyntaxKind::DeclareKeyword),
            "module" | "namespace" => Some(SyntaxKind::ModuleKeyword),
            "require" => Some(SyntaxKind::RequireKeyword),
            _ => None,
        }
    }

    /// The punctuation table, longest symbols first.
    ///
    /// Multi-character symbols must stay ahead of their single-character
    /// prefixes so `=>` never scans as `=` followed by `>`.
    pub const PUNCTUATION: &'static [(&'static str, SyntaxKind)] = &[
        ("=>", SyntaxKind::EqualsGreaterThanToken),
        ("...", SyntaxKind::DotDotDotToken),
        (":", SyntaxKind::ColonToken),
        (";", SyntaxKind::SemicolonToken),
        (".", SyntaxKind::DotToken),
        (",", SyntaxKind::CommaToken),
        ("/", SyntaxKind::SlashToken),
        ("\\", SyntaxKind::BackslashToken),
        ("?", SyntaxKind::QuestionToken),
        ("*", SyntaxKind::AsteriskToken),
        ("(", SyntaxKind::OpenParenToken),
        (")", SyntaxKind::CloseParenToken),
        ("{", SyntaxKind::OpenBraceToken),
        ("}", SyntaxKind::CloseBraceToken),
        ("[", SyntaxKind::OpenBracketToken),
        ("]", SyntaxKind::CloseBracketToken),
        ("=", SyntaxKind::EqualsToken),
        ("|", SyntaxKind::BarToken),
        ("&", SyntaxKind::AmpersandToken),
        ("<", SyntaxKind::LessThanToken),
        (">", SyntaxKind::GreaterThanToken),
    ];

    /// Get the punctuation text for a punctuation kind, or None.
    pub fn punctuation_text(self) -> Option<&'static str> {
        Self::PUNCTUATION
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(text, _)| *text)
    }

    /// A short human-readable description used in "expected X" messages.
    pub fn describe(self) -> String {
        if let Some(text) = self.punctuation_text() {
            return format!("'{}'", text);
        }
        match self {
            SyntaxKind::Identifier => "an identifier".to_string(),
            SyntaxKind::StringLiteral => "a string literal".to_string(),
            SyntaxKind::NumericLiteral => "a number".to_string(),
            SyntaxKind::NewLineToken => "a newline".to_string(),
            SyntaxKind::EndOfFileToken => "end of file".to_string(),
            SyntaxKind::VarKeyword => "'var' or 'let'".to_string(),
            SyntaxKind::VisibilityKeyword => "a visibility modifier".to_string(),
            SyntaxKind::ModuleKeyword => "'namespace' or 'module'".to_string(),
            kind if kind.is_keyword() => {
                let name = format!("{:?}", kind);
                format!("'{}'", name.trim_end_matches("Keyword").to_lowercase())
            }
            kind => format!("{:?}", kind),
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(SyntaxKind::Identifier.is_terminal());
        assert!(SyntaxKind::NewLineToken.is_terminal());
        assert!(SyntaxKind::GreaterThanToken.is_terminal());
        assert!(!SyntaxKind::File.is_terminal());
        assert!(!SyntaxKind::ElementKey.is_terminal());
        assert!(SyntaxKind::UnionType.is_node());
    }

    #[test]
    fn test_keyword_table() {
        assert_eq!(SyntaxKind::from_keyword("let"), Some(SyntaxKind::VarKeyword));
        assert_eq!(SyntaxKind::from_keyword("namespace"), Some(SyntaxKind::ModuleKeyword));
        assert_eq!(SyntaxKind::from_keyword("protected"), Some(SyntaxKind::VisibilityKeyword));
        assert_eq!(SyntaxKind::from_keyword("string"), None);
        assert_eq!(SyntaxKind::from_keyword("Class"), None);
    }

    #[test]
    fn test_reserved_words_are_keywords() {
        assert!(SyntaxKind::ClassKeyword.is_reserved_word());
        assert!(SyntaxKind::VarKeyword.is_reserved_word());
        assert!(!SyntaxKind::TypeKeyword.is_reserved_word());
        assert!(SyntaxKind::TypeKeyword.is_keyword());
        assert!(SyntaxKind::ConstructorKeyword.is_keyword());
        assert!(!SyntaxKind::Identifier.is_keyword());
        assert!(!SyntaxKind::EqualsGreaterThanToken.is_keyword());
    }

    #[test]
    fn test_punctuation_longest_first() {
        let arrow = SyntaxKind::PUNCTUATION.iter().position(|(t, _)| *t == "=>").unwrap();
        let equals = SyntaxKind::PUNCTUATION.iter().position(|(t, _)| *t == "=").unwrap();
        let spread = SyntaxKind::PUNCTUATION.iter().position(|(t, _)| *t == "...").unwrap();
        let dot = SyntaxKind::PUNCTUATION.iter().position(|(t, _)| *t == ".").unwrap();
        assert!(arrow < equals);
        assert!(spread < dot);
    }

    #[test]
    fn test_describe() {
        assert_eq!(SyntaxKind::OpenBraceToken.describe(), "'{'");
        assert_eq!(SyntaxKind::ExtendsKeyword.describe(), "'extends'");
        assert_eq!(SyntaxKind::Identifier.describe(), "an identifier");
    }
}
