//! Parser utility functions.

use tsdp_ast::syntax_kind::SyntaxKind;

/// Whether a token of this kind can be used as a name.
///
/// Contextual keywords qualify because they are demoted to identifiers
/// wherever a name is expected.
pub fn is_name(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier || (kind.is_keyword() && !kind.is_reserved_word())
}

/// Whether a token of this kind can be a member or property key.
///
/// Any word is accepted as a key, reserved words included, as well as string
/// and numeric literals.
pub fn is_element_key(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier || kind.is_keyword() || kind.is_literal()
}

/// Whether a token following a modifier-shaped word shows that the word is
/// really the member's own name (`static?: boolean`, `readonly(): void`).
pub fn follows_member_name(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::QuestionToken
            | SyntaxKind::ColonToken
            | SyntaxKind::OpenParenToken
            | SyntaxKind::LessThanToken
    )
}

/// Check if a token kind can start a declaration after `declare` or `export`.
pub fn can_start_declaration(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ModuleKeyword
            | SyntaxKind::VarKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::EnumKeyword
    )
}

/// Check if the token after `export` begins an export form rather than an
/// exported declaration.
pub fn is_export_form(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::EqualsToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::AsteriskToken
            | SyntaxKind::AsKeyword
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert!(is_name(SyntaxKind::Identifier));
        assert!(is_name(SyntaxKind::TypeKeyword));
        assert!(is_name(SyntaxKind::FromKeyword));
        assert!(!is_name(SyntaxKind::ClassKeyword));
        assert!(!is_name(SyntaxKind::StringLiteral));
    }

    #[test]
    fn test_element_keys() {
        assert!(is_element_key(SyntaxKind::ClassKeyword));
        assert!(is_element_key(SyntaxKind::NumericLiteral));
        assert!(is_element_key(SyntaxKind::StringLiteral));
        assert!(!is_element_key(SyntaxKind::OpenBracketToken));
    }
}
