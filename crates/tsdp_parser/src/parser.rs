//! The declaration-file parser.
//!
//! A recursive descent parser with one function per grammar production. Each
//! production creates its node, pushes children in grammar order and returns
//! the node by value. Parsing is fail-fast: the first error unwinds to the
//! caller with `?` and nothing is retried.

use std::collections::HashMap;

use tracing::trace;
use tsdp_ast::node::{demote_to_identifier, ParseNode};
use tsdp_ast::syntax_kind::SyntaxKind;
use tsdp_core::text::TextPos;
use tsdp_diagnostics::{messages, ParseResult, SyntaxError};
use tsdp_scanner::{LexerOptions, LexicalToken};

use crate::stream::TokenStream;
use crate::utilities::*;

/// Default limit on how deeply types and namespaces may nest.
pub const DEFAULT_MAX_DEPTH: u32 = 200;

/// Options for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub lexer: LexerOptions,
    /// Nesting deeper than this fails with `NestingTooDeep`.
    pub max_depth: u32,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            lexer: LexerOptions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The parser produces a File tree from declaration source text.
pub struct Parser {
    stream: TokenStream,
    max_depth: u32,
    /// Current nesting of types and namespaces.
    depth: u32,
    /// Group-or-lambda decisions for `(` tokens already scanned, keyed by the
    /// byte offset of the `(`.
    lambda_ahead: HashMap<TextPos, bool>,
}

impl Parser {
    /// Scan `source` with the default options.
    pub fn new(file_name: &str, source: &str) -> ParseResult<Self> {
        Self::with_options(file_name, source, ParserOptions::default())
    }

    pub fn with_options(file_name: &str, source: &str, options: ParserOptions) -> ParseResult<Self> {
        let stream = TokenStream::from_source(file_name, source, options.lexer)?;
        Ok(Self::from_stream(stream, options))
    }

    pub fn from_stream(stream: TokenStream, options: ParserOptions) -> Self {
        Self {
            stream,
            max_depth: options.max_depth,
            depth: 0,
            lambda_ahead: HashMap::new(),
        }
    }

    /// Parse the whole file. The File node has one FileElement per top-level
    /// declaration, in source order.
    pub fn parse_file(mut self) -> ParseResult<ParseNode> {
        trace!(file = self.stream.file_name(), "parse_file");
        let mut file = ParseNode::new(SyntaxKind::File);
        while !self.stream.is_at_end() {
            file.push(self.parse_file_element()?);
        }
        Ok(file)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// Consume the next significant token as a leaf.
    fn bump(&mut self) -> ParseNode {
        self.stream.next(true).into_leaf()
    }

    fn expect(&mut self, kind: SyntaxKind) -> ParseResult<ParseNode> {
        Ok(self.stream.expect(kind)?.into_leaf())
    }

    fn optional(&mut self, kind: SyntaxKind) -> Option<ParseNode> {
        self.stream.next_if(kind).map(LexicalToken::into_leaf)
    }

    /// Consume a name, demoting a contextual keyword to an identifier.
    fn parse_identifier(&mut self, expected: &str) -> ParseResult<ParseNode> {
        if !is_name(self.stream.peek_kind(0)) {
            return Err(self.stream.unexpected(expected));
        }
        let mut name = self.bump();
        demote_to_identifier(&mut name);
        Ok(name)
    }

    /// Whether the next token closes the current list. Running out of input
    /// inside the list is an error.
    fn at_list_end(&self, close: SyntaxKind) -> ParseResult<bool> {
        let kind = self.stream.peek_kind(0);
        if kind == close {
            Ok(true)
        } else if kind == SyntaxKind::EndOfFileToken {
            Err(self.stream.unexpected(&close.describe()))
        } else {
            Ok(false)
        }
    }

    fn enter_nested(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            let limit = self.max_depth.to_string();
            return Err(self.stream.error(&messages::NESTING_TOO_DEEP, &[&limit]));
        }
        Ok(())
    }

    fn expected_declaration(&self) -> SyntaxError {
        let token = self.stream.peek(0, true);
        if token.is_eof() {
            self.stream.unexpected("a declaration")
        } else {
            self.stream
                .error(&messages::EXPECTED_DECLARATION, &[token.display_text()])
        }
    }

    // ========================================================================
    // Terminators
    // ========================================================================

    /// Statement terminator: `;` or a newline, kept as the statement's last
    /// leaf. A closing `}` or the end of the file ends the statement without
    /// being consumed.
    fn parse_terminator(&mut self, node: &mut ParseNode) -> ParseResult<()> {
        match self.stream.peek(0, false).kind {
            SyntaxKind::SemicolonToken | SyntaxKind::NewLineToken => {
                node.push(self.stream.next(false).into_leaf());
                Ok(())
            }
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => Ok(()),
            _ => {
                let token = self.stream.peek(0, false);
                Err(self.stream.error_at_token(
                    token,
                    &messages::EXPECTED_TERMINATOR,
                    &[token.display_text()],
                ))
            }
        }
    }

    /// Member terminator: `;`, `,` or a newline. The last member before `}`
    /// needs none.
    fn parse_member_terminator(&mut self, elem: &mut ParseNode) -> ParseResult<()> {
        match self.stream.peek(0, false).kind {
            SyntaxKind::SemicolonToken | SyntaxKind::CommaToken | SyntaxKind::NewLineToken => {
                elem.push(self.stream.next(false).into_leaf());
                Ok(())
            }
            SyntaxKind::CloseBraceToken => Ok(()),
            SyntaxKind::EndOfFileToken => Err(self.stream.unexpected("'}'")),
            _ => {
                let token = self.stream.peek(0, false);
                Err(self.stream.error_at_token(
                    token,
                    &messages::EXPECTED_MEMBER_TERMINATOR,
                    &[token.display_text()],
                ))
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_file_element(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_file_element");
        let mut elem = ParseNode::new(SyntaxKind::FileElement);
        match self.stream.peek_kind(0) {
            SyntaxKind::ImportKeyword => elem.push(self.parse_import()?),
            SyntaxKind::ExportKeyword => elem.push(self.parse_export()?),
            SyntaxKind::InterfaceKeyword => elem.push(self.parse_class()?),
            SyntaxKind::TypeKeyword => elem.push(self.parse_type_def()?),
            SyntaxKind::DeclareKeyword => {
                elem.push(self.bump());
                elem.push(self.parse_declaration()?);
            }
            _ => {
                let token = self.stream.peek(0, true);
                return Err(self.stream.error(
                    &messages::EXPECTED_DECLARE_AT_GLOBAL_LEVEL,
                    &[token.display_text()],
                ));
            }
        }
        Ok(elem)
    }

    /// Whatever may follow `declare`.
    fn parse_declaration(&mut self) -> ParseResult<ParseNode> {
        match (self.stream.peek_kind(0), self.stream.peek_kind(1)) {
            (SyntaxKind::ModuleKeyword, _) => self.parse_namespace(),
            (SyntaxKind::ConstKeyword, SyntaxKind::EnumKeyword) | (SyntaxKind::EnumKeyword, _) => {
                self.parse_enum()
            }
            (SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword, _) => self.parse_global_variable(),
            (SyntaxKind::FunctionKeyword, _) => self.parse_global_function(),
            (SyntaxKind::ClassKeyword | SyntaxKind::InterfaceKeyword, _) => self.parse_class(),
            (SyntaxKind::TypeKeyword, _) => self.parse_type_def(),
            _ => Err(self.expected_declaration()),
        }
    }

    fn parse_namespace(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_namespace");
        self.enter_nested()?;
        let mut ns = ParseNode::new(SyntaxKind::Namespace);
        ns.push(self.expect(SyntaxKind::ModuleKeyword)?);
        if self.stream.at(SyntaxKind::StringLiteral) {
            ns.push(self.bump());
        } else {
            ns.push(self.parse_dot_id()?);
        }
        ns.push(self.expect(SyntaxKind::OpenBraceToken)?);
        while !self.at_list_end(SyntaxKind::CloseBraceToken)? {
            ns.push(self.parse_namespace_element()?);
        }
        ns.push(self.bump());
        self.depth -= 1;
        Ok(ns)
    }

    fn parse_namespace_element(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_namespace_element");
        let mut elem = ParseNode::new(SyntaxKind::NamespaceElement);
        if self.at_export_form() {
            elem.push(self.parse_export()?);
            return Ok(elem);
        }
        if let Some(export) = self.optional(SyntaxKind::ExportKeyword) {
            elem.push(export);
        }
        if let Some(declare) = self.optional(SyntaxKind::DeclareKeyword) {
            elem.push(declare);
        }
        let child = match self.stream.peek_kind(0) {
            SyntaxKind::ImportKeyword => self.parse_import()?,
            kind if can_start_declaration(kind) => self.parse_declaration()?,
            _ => return Err(self.expected_declaration()),
        };
        elem.push(child);
        Ok(elem)
    }

    /// Whether the cursor is at an `export` that is not followed by a
    /// declaration (`export = x`, `export { a }`, `export default x`, ...).
    fn at_export_form(&self) -> bool {
        if !self.stream.at(SyntaxKind::ExportKeyword) {
            return false;
        }
        let next = self.stream.peek(1, true);
        is_export_form(next.kind)
            || (next.is(SyntaxKind::Identifier) && next.text == "default")
            || (next.is(SyntaxKind::TypeKeyword) && self.stream.peek_kind(2) == SyntaxKind::OpenBraceToken)
    }

    fn parse_global_variable(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_global_variable");
        let mut var = ParseNode::new(SyntaxKind::GlobalVariable);
        let keyword = self.stream.expect_one_of(
            &[SyntaxKind::VarKeyword, SyntaxKind::ConstKeyword],
            "'var', 'let' or 'const'",
        )?;
        var.push(keyword.into_leaf());
        var.push(self.parse_variable()?);
        self.parse_terminator(&mut var)?;
        Ok(var)
    }

    fn parse_global_function(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_global_function");
        let mut func = ParseNode::new(SyntaxKind::GlobalFunction);
        func.push(self.expect(SyntaxKind::FunctionKeyword)?);
        func.push(self.parse_function()?);
        self.parse_terminator(&mut func)?;
        Ok(func)
    }

    fn parse_type_def(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_type_def");
        let mut def = ParseNode::new(SyntaxKind::TypeDef);
        def.push(self.expect(SyntaxKind::TypeKeyword)?);
        def.push(self.parse_identifier("a type alias name")?);
        if self.stream.at(SyntaxKind::LessThanToken) {
            def.push(self.parse_generic_parameter_pack()?);
        }
        def.push(self.expect(SyntaxKind::EqualsToken)?);
        def.push(self.parse_union_type()?);
        self.parse_terminator(&mut def)?;
        Ok(def)
    }

    fn parse_enum(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_enum");
        let mut node = ParseNode::new(SyntaxKind::Enum);
        if let Some(konst) = self.optional(SyntaxKind::ConstKeyword) {
            node.push(konst);
        }
        node.push(self.expect(SyntaxKind::EnumKeyword)?);
        node.push(self.parse_identifier("an enum name")?);
        node.push(self.expect(SyntaxKind::OpenBraceToken)?);
        while !self.at_list_end(SyntaxKind::CloseBraceToken)? {
            node.push(self.parse_enum_member()?);
            match self.optional(SyntaxKind::CommaToken) {
                Some(comma) => node.push(comma),
                None => break,
            }
        }
        node.push(self.expect(SyntaxKind::CloseBraceToken)?);
        Ok(node)
    }

    fn parse_enum_member(&mut self) -> ParseResult<ParseNode> {
        let mut member = ParseNode::new(SyntaxKind::EnumMember);
        member.push(self.parse_element_key()?);
        if let Some(equals) = self.optional(SyntaxKind::EqualsToken) {
            member.push(equals);
            let value = self.stream.expect_one_of(
                &[SyntaxKind::NumericLiteral, SyntaxKind::StringLiteral],
                "a number or a string",
            )?;
            member.push(value.into_leaf());
        }
        Ok(member)
    }

    // ========================================================================
    // Imports and exports
    // ========================================================================

    fn parse_import(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_import");
        let mut import = ParseNode::new(SyntaxKind::Import);
        import.push(self.expect(SyntaxKind::ImportKeyword)?);

        let first = self.stream.peek_kind(0);
        let second = self.stream.peek_kind(1);
        if first == SyntaxKind::StringLiteral {
            // import "side-effect";
            import.push(self.bump());
        } else if is_name(first) && second == SyntaxKind::EqualsToken {
            // import X = require("m"); or import X = A.B;
            import.push(self.parse_identifier("an import name")?);
            import.push(self.bump());
            if self.stream.at(SyntaxKind::RequireKeyword) {
                import.push(self.bump());
                import.push(self.expect(SyntaxKind::OpenParenToken)?);
                import.push(self.expect(SyntaxKind::StringLiteral)?);
                import.push(self.expect(SyntaxKind::CloseParenToken)?);
            } else {
                import.push(self.parse_dot_id()?);
            }
        } else {
            if first == SyntaxKind::TypeKeyword
                && matches!(second, SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken)
            {
                import.push(self.bump());
                self.parse_import_bindings(&mut import)?;
            } else if is_name(first) {
                import.push(self.parse_identifier("an import name")?);
                if let Some(comma) = self.optional(SyntaxKind::CommaToken) {
                    import.push(comma);
                    self.parse_import_bindings(&mut import)?;
                }
            } else {
                self.parse_import_bindings(&mut import)?;
            }
            import.push(self.expect(SyntaxKind::FromKeyword)?);
            import.push(self.expect(SyntaxKind::StringLiteral)?);
        }
        self.parse_terminator(&mut import)?;
        Ok(import)
    }

    /// `* as Name` or `{ a, b as c }`.
    fn parse_import_bindings(&mut self, import: &mut ParseNode) -> ParseResult<()> {
        if let Some(star) = self.optional(SyntaxKind::AsteriskToken) {
            import.push(star);
            import.push(self.expect(SyntaxKind::AsKeyword)?);
            import.push(self.parse_identifier("a namespace name")?);
            return Ok(());
        }
        let open = self
            .stream
            .expect_one_of(&[SyntaxKind::OpenBraceToken], "'*' or '{'")?;
        import.push(open.into_leaf());
        self.parse_specifier_list(import, SyntaxKind::ImportSpecifier)
    }

    /// Specifiers up to and including the closing `}`. The opening brace has
    /// already been pushed. A trailing comma is allowed.
    fn parse_specifier_list(&mut self, node: &mut ParseNode, kind: SyntaxKind) -> ParseResult<()> {
        while !self.at_list_end(SyntaxKind::CloseBraceToken)? {
            let mut specifier = ParseNode::new(kind);
            specifier.push(self.parse_element_key()?);
            if let Some(alias) = self.optional(SyntaxKind::AsKeyword) {
                specifier.push(alias);
                specifier.push(self.parse_element_key()?);
            }
            node.push(specifier);
            match self.optional(SyntaxKind::CommaToken) {
                Some(comma) => node.push(comma),
                None => break,
            }
        }
        node.push(self.expect(SyntaxKind::CloseBraceToken)?);
        Ok(())
    }

    fn parse_export(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_export");
        let mut export = ParseNode::new(SyntaxKind::Export);
        export.push(self.expect(SyntaxKind::ExportKeyword)?);

        match self.stream.peek_kind(0) {
            SyntaxKind::EqualsToken => {
                export.push(self.bump());
                export.push(self.parse_dot_id()?);
                self.parse_terminator(&mut export)?;
            }
            SyntaxKind::TypeKeyword if self.stream.peek_kind(1) == SyntaxKind::OpenBraceToken => {
                export.push(self.bump());
                export.push(self.bump());
                self.parse_export_list_tail(&mut export)?;
            }
            SyntaxKind::OpenBraceToken => {
                export.push(self.bump());
                self.parse_export_list_tail(&mut export)?;
            }
            SyntaxKind::AsteriskToken => {
                export.push(self.bump());
                if let Some(alias) = self.optional(SyntaxKind::AsKeyword) {
                    export.push(alias);
                    export.push(self.parse_identifier("a namespace name")?);
                }
                export.push(self.expect(SyntaxKind::FromKeyword)?);
                export.push(self.expect(SyntaxKind::StringLiteral)?);
                self.parse_terminator(&mut export)?;
            }
            SyntaxKind::AsKeyword => {
                // export as namespace Name;
                export.push(self.bump());
                export.push(self.expect(SyntaxKind::ModuleKeyword)?);
                export.push(self.parse_identifier("a namespace name")?);
                self.parse_terminator(&mut export)?;
            }
            SyntaxKind::Identifier if self.stream.peek(0, true).text == "default" => {
                export.push(self.bump());
                if can_start_declaration(self.stream.peek_kind(0)) {
                    export.push(self.parse_declaration()?);
                } else {
                    export.push(self.parse_dot_id()?);
                    self.parse_terminator(&mut export)?;
                }
            }
            SyntaxKind::DeclareKeyword => {
                export.push(self.bump());
                export.push(self.parse_declaration()?);
            }
            kind if can_start_declaration(kind) => export.push(self.parse_declaration()?),
            _ => return Err(self.expected_declaration()),
        }
        Ok(export)
    }

    /// The rest of `export { ... } [from "m"]`.
    fn parse_export_list_tail(&mut self, export: &mut ParseNode) -> ParseResult<()> {
        self.parse_specifier_list(export, SyntaxKind::ExportSpecifier)?;
        if let Some(from) = self.optional(SyntaxKind::FromKeyword) {
            export.push(from);
            export.push(self.expect(SyntaxKind::StringLiteral)?);
        }
        self.parse_terminator(export)
    }

    // ========================================================================
    // Classes and members
    // ========================================================================

    fn parse_class(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_class");
        let mut class = ParseNode::new(SyntaxKind::Class);
        let keyword = self.stream.expect_one_of(
            &[SyntaxKind::ClassKeyword, SyntaxKind::InterfaceKeyword],
            "'class' or 'interface'",
        )?;
        class.push(keyword.into_leaf());
        class.push(self.parse_identifier("a class name")?);
        if self.stream.at(SyntaxKind::LessThanToken) {
            class.push(self.parse_generic_parameter_pack()?);
        }
        for clause in [SyntaxKind::ExtendsKeyword, SyntaxKind::ImplementsKeyword] {
            if let Some(keyword) = self.optional(clause) {
                class.push(keyword);
                class.push(self.parse_heritage()?);
                while let Some(comma) = self.optional(SyntaxKind::CommaToken) {
                    class.push(comma);
                    class.push(self.parse_heritage()?);
                }
            }
        }
        class.push(self.expect(SyntaxKind::OpenBraceToken)?);
        while !self.at_list_end(SyntaxKind::CloseBraceToken)? {
            class.push(self.parse_class_element()?);
        }
        class.push(self.bump());
        Ok(class)
    }

    /// One entry of an `extends` or `implements` list: a dotted name with
    /// optional type arguments.
    fn parse_heritage(&mut self) -> ParseResult<ParseNode> {
        let mut heritage = ParseNode::new(SyntaxKind::Type);
        heritage.push(self.parse_dot_id()?);
        if self.stream.peek(0, false).is(SyntaxKind::LessThanToken) {
            self.parse_type_arguments(&mut heritage)?;
        }
        Ok(heritage)
    }

    fn parse_class_element(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_class_element");
        let mut elem = ParseNode::new(SyntaxKind::ClassElement);
        match (self.stream.peek_kind(0), self.stream.peek_kind(1)) {
            (SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken, _) => {
                elem.push(self.parse_object_callable()?)
            }
            (SyntaxKind::OpenBracketToken, _)
            | (SyntaxKind::ReadonlyKeyword, SyntaxKind::OpenBracketToken) => {
                elem.push(self.parse_map_object()?)
            }
            (SyntaxKind::ConstructorKeyword, SyntaxKind::OpenParenToken) => {
                elem.push(self.parse_constructor()?)
            }
            _ => self.parse_named_member(&mut elem)?,
        }
        self.parse_member_terminator(&mut elem)?;
        Ok(elem)
    }

    /// A property or method with its leading modifiers.
    ///
    /// Modifiers are tried in a fixed order (visibility, `static`,
    /// `readonly`). A modifier-shaped word directly followed by `?`, `:`, `(`
    /// or `<` is the member's name and is left alone.
    fn parse_named_member(&mut self, elem: &mut ParseNode) -> ParseResult<()> {
        let mut readonly = None;
        for modifier in [
            SyntaxKind::VisibilityKeyword,
            SyntaxKind::StaticKeyword,
            SyntaxKind::ReadonlyKeyword,
        ] {
            if self.stream.at(modifier) && !follows_member_name(self.stream.peek_kind(1)) {
                let token = self.stream.next(true);
                if modifier == SyntaxKind::ReadonlyKeyword {
                    readonly = Some(token.clone());
                }
                elem.push(token.into_leaf());
            }
        }

        let next = self.stream.peek_kind(1);
        let is_method = matches!(next, SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
            || (next == SyntaxKind::QuestionToken
                && matches!(
                    self.stream.peek_kind(2),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                ));
        if is_method {
            if let Some(token) = readonly {
                return Err(self
                    .stream
                    .error_at_token(&token, &messages::READONLY_ON_METHOD, &[]));
            }
            elem.push(self.parse_function()?);
        } else {
            elem.push(self.parse_variable()?);
        }
        Ok(())
    }

    /// A call signature: `[<T>] ( [params] ) : type`.
    fn parse_object_callable(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_object_callable");
        let mut callable = ParseNode::new(SyntaxKind::ObjectCallable);
        if self.stream.at(SyntaxKind::LessThanToken) {
            callable.push(self.parse_generic_parameter_pack()?);
        }
        self.parse_signature(&mut callable)?;
        Ok(callable)
    }

    fn parse_constructor(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_constructor");
        let mut ctor = ParseNode::new(SyntaxKind::Constructor);
        ctor.push(self.expect(SyntaxKind::ConstructorKeyword)?);
        self.parse_parameter_list(&mut ctor)?;
        Ok(ctor)
    }

    /// `key [?] [<T>] ( [params] ) : return-type`
    fn parse_function(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_function");
        let mut func = ParseNode::new(SyntaxKind::Function);
        func.push(self.parse_element_key()?);
        if let Some(question) = self.optional(SyntaxKind::QuestionToken) {
            func.push(question);
        }
        if self.stream.at(SyntaxKind::LessThanToken) {
            func.push(self.parse_generic_parameter_pack()?);
        }
        self.parse_signature(&mut func)?;
        Ok(func)
    }

    /// `( [params] ) : return-type`
    fn parse_signature(&mut self, node: &mut ParseNode) -> ParseResult<()> {
        self.parse_parameter_list(node)?;
        node.push(self.expect(SyntaxKind::ColonToken)?);
        node.push(self.parse_return_type()?);
        Ok(())
    }

    fn parse_parameter_list(&mut self, node: &mut ParseNode) -> ParseResult<()> {
        node.push(self.expect(SyntaxKind::OpenParenToken)?);
        if !self.stream.at(SyntaxKind::CloseParenToken) {
            node.push(self.parse_parameter_pack()?);
        }
        node.push(self.expect(SyntaxKind::CloseParenToken)?);
        Ok(())
    }

    /// A type predicate (`x is T`) or an ordinary type. The `is` must be on
    /// the same line as the name; a member named `is` on the next line starts
    /// a new member.
    fn parse_return_type(&mut self) -> ParseResult<ParseNode> {
        if is_name(self.stream.peek_kind(0)) && self.stream.peek_adjacent().is(SyntaxKind::IsKeyword) {
            self.parse_function_type_predicate()
        } else {
            self.parse_union_type()
        }
    }

    fn parse_function_type_predicate(&mut self) -> ParseResult<ParseNode> {
        let mut predicate = ParseNode::new(SyntaxKind::FunctionTypePredicate);
        predicate.push(self.parse_identifier("a parameter name")?);
        predicate.push(self.expect(SyntaxKind::IsKeyword)?);
        predicate.push(self.parse_union_type()?);
        Ok(predicate)
    }

    fn parse_parameter_pack(&mut self) -> ParseResult<ParseNode> {
        let mut pack = ParseNode::new(SyntaxKind::ParameterPack);
        pack.push(self.parse_parameter()?);
        while let Some(comma) = self.optional(SyntaxKind::CommaToken) {
            pack.push(comma);
            if self.stream.at(SyntaxKind::CloseParenToken) {
                break;
            }
            pack.push(self.parse_parameter()?);
        }
        Ok(pack)
    }

    /// `[...] variable`. Default values are not part of declaration syntax.
    fn parse_parameter(&mut self) -> ParseResult<ParseNode> {
        let mut param = ParseNode::new(SyntaxKind::Parameter);
        if let Some(spread) = self.optional(SyntaxKind::DotDotDotToken) {
            param.push(spread);
        }
        let variable = self.parse_variable()?;
        if self.stream.at(SyntaxKind::EqualsToken) {
            let name = variable
                .child(0)
                .and_then(|key| key.child(0))
                .map_or("", ParseNode::text);
            return Err(self
                .stream
                .error(&messages::PARAMETER_INITIALIZER_NOT_ALLOWED, &[name]));
        }
        param.push(variable);
        Ok(param)
    }

    /// An index signature `[key: string]: T` or a mapped member
    /// `[K in keyof T]: U`, optionally `readonly`.
    fn parse_map_object(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_map_object");
        let mut map = ParseNode::new(SyntaxKind::MapObject);
        if let Some(readonly) = self.optional(SyntaxKind::ReadonlyKeyword) {
            map.push(readonly);
        }
        map.push(self.expect(SyntaxKind::OpenBracketToken)?);
        map.push(self.parse_identifier("a key name")?);
        if let Some(in_keyword) = self.optional(SyntaxKind::InKeyword) {
            map.push(in_keyword);
            map.push(self.parse_union_type()?);
        } else {
            map.push(self.expect(SyntaxKind::ColonToken)?);
            map.push(self.parse_identifier("a key type")?);
        }
        map.push(self.expect(SyntaxKind::CloseBracketToken)?);
        if let Some(question) = self.optional(SyntaxKind::QuestionToken) {
            map.push(question);
        }
        map.push(self.expect(SyntaxKind::ColonToken)?);
        map.push(self.parse_union_type()?);
        Ok(map)
    }

    /// `key [?] : type`
    fn parse_variable(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_variable");
        let mut var = ParseNode::new(SyntaxKind::Variable);
        var.push(self.parse_element_key()?);
        if let Some(question) = self.optional(SyntaxKind::QuestionToken) {
            var.push(question);
        }
        var.push(self.expect(SyntaxKind::ColonToken)?);
        var.push(self.parse_union_type()?);
        Ok(var)
    }

    // ========================================================================
    // Generics
    // ========================================================================

    /// `< param (, param)* >`. Once a parameter has a default, every later
    /// one must have one too; this is checked as each parameter is parsed.
    fn parse_generic_parameter_pack(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_generic_parameter_pack");
        let mut pack = ParseNode::new(SyntaxKind::GenericParameterPack);
        pack.push(self.expect(SyntaxKind::LessThanToken)?);
        let mut seen_default = false;
        loop {
            let param = self.parse_generic_parameter()?;
            if param.find(SyntaxKind::EqualsToken).is_some() {
                seen_default = true;
            } else if seen_default {
                let name = &param.children[0];
                let (position, span) = name.position.unwrap_or_default();
                return Err(self.stream.error_at(
                    position,
                    span,
                    &messages::GENERIC_DEFAULTS_MUST_TRAIL,
                    &[name.text()],
                ));
            }
            pack.push(param);
            match self.optional(SyntaxKind::CommaToken) {
                Some(comma) => pack.push(comma),
                None => break,
            }
        }
        pack.push(self.expect(SyntaxKind::GreaterThanToken)?);
        Ok(pack)
    }

    /// `name [extends type] [= type]`
    fn parse_generic_parameter(&mut self) -> ParseResult<ParseNode> {
        let mut param = ParseNode::new(SyntaxKind::GenericParameter);
        param.push(self.parse_identifier("a type parameter name")?);
        if let Some(extends) = self.optional(SyntaxKind::ExtendsKeyword) {
            param.push(extends);
            param.push(self.parse_union_type()?);
        }
        if let Some(equals) = self.optional(SyntaxKind::EqualsToken) {
            param.push(equals);
            param.push(self.parse_union_type()?);
        }
        Ok(param)
    }

    /// `< type (, type)* >` appended to a type reference.
    fn parse_type_arguments(&mut self, ty: &mut ParseNode) -> ParseResult<()> {
        ty.push(self.expect(SyntaxKind::LessThanToken)?);
        ty.push(self.parse_union_type()?);
        while let Some(comma) = self.optional(SyntaxKind::CommaToken) {
            ty.push(comma);
            ty.push(self.parse_union_type()?);
        }
        ty.push(self.expect(SyntaxKind::GreaterThanToken)?);
        Ok(())
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// `[|] type (| type)*`. The `|` separators are not kept, the optional
    /// leading one included, so printed code never starts a union with `|`.
    /// A union of one alternative is returned as that alternative.
    fn parse_union_type(&mut self) -> ParseResult<ParseNode> {
        self.enter_nested()?;
        let result = self.parse_union_type_worker();
        self.depth -= 1;
        result
    }

    fn parse_union_type_worker(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_union_type");
        self.stream.next_if(SyntaxKind::BarToken);
        let mut union = ParseNode::new(SyntaxKind::UnionType);
        union.push(self.parse_intersection_type()?);
        while self.stream.next_if(SyntaxKind::BarToken).is_some() {
            union.push(self.parse_intersection_type()?);
        }
        Ok(collapse(union))
    }

    /// `type (& type)*`, collapsed the same way as unions.
    fn parse_intersection_type(&mut self) -> ParseResult<ParseNode> {
        let mut intersection = ParseNode::new(SyntaxKind::IntersectionType);
        intersection.push(self.parse_type()?);
        while self.stream.next_if(SyntaxKind::AmpersandToken).is_some() {
            intersection.push(self.parse_type()?);
        }
        Ok(collapse(intersection))
    }

    fn parse_type(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_type");
        match self.stream.peek_kind(0) {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => Ok(self.bump()),
            SyntaxKind::OpenBraceToken => {
                let anonymous = self.parse_anonymous_type()?;
                if self.stream.peek(0, false).is(SyntaxKind::OpenBracketToken) {
                    let mut ty = ParseNode::new(SyntaxKind::Type);
                    ty.push(anonymous);
                    self.parse_array_suffixes(&mut ty)?;
                    Ok(ty)
                } else {
                    Ok(anonymous)
                }
            }
            SyntaxKind::LessThanToken => self.parse_lambda_type(),
            SyntaxKind::OpenParenToken => {
                if self.is_lambda_ahead()? {
                    self.parse_lambda_type()
                } else {
                    self.parse_type_group()
                }
            }
            _ => self.parse_type_reference(),
        }
    }

    /// `[typeof|keyof]* name [<args>] suffixes`
    fn parse_type_reference(&mut self) -> ParseResult<ParseNode> {
        let mut ty = ParseNode::new(SyntaxKind::Type);
        while matches!(
            self.stream.peek_kind(0),
            SyntaxKind::TypeOfKeyword | SyntaxKind::KeyOfKeyword
        ) {
            ty.push(self.bump());
        }
        if !is_name(self.stream.peek_kind(0)) {
            return Err(self.stream.unexpected("a type"));
        }
        ty.push(self.parse_dot_id()?);
        // Same line only: a `<` on the next line opens a generic call signature.
        if self.stream.peek(0, false).is(SyntaxKind::LessThanToken) {
            self.parse_type_arguments(&mut ty)?;
        }
        self.parse_array_suffixes(&mut ty)?;
        Ok(ty)
    }

    /// `[]` and `[K]` suffixes. Each must open on the same line as the type
    /// it follows, so an index signature on the next line is left alone.
    fn parse_array_suffixes(&mut self, ty: &mut ParseNode) -> ParseResult<()> {
        while self.stream.peek(0, false).is(SyntaxKind::OpenBracketToken) {
            ty.push(self.bump());
            if !self.stream.at(SyntaxKind::CloseBracketToken) {
                ty.push(self.parse_union_type()?);
            }
            ty.push(self.expect(SyntaxKind::CloseBracketToken)?);
        }
        Ok(())
    }

    /// Decide whether the `(` at the cursor opens a lambda's parameter list.
    ///
    /// Scans to the matching `)` without consuming anything and reports
    /// whether `=>` follows it. Every `(` closed during the scan gets its
    /// decision recorded, so nested groups are not scanned again and the
    /// whole file costs one pass.
    fn is_lambda_ahead(&mut self) -> ParseResult<bool> {
        let start = self.stream.peek(0, true).span.start;
        if let Some(&decision) = self.lambda_ahead.get(&start) {
            return Ok(decision);
        }
        let mut open = Vec::new();
        let mut tokens = self.stream.lookahead().peekable();
        while let Some(token) = tokens.next() {
            match token.kind {
                SyntaxKind::OpenParenToken => open.push(token.span.start),
                SyntaxKind::CloseParenToken => {
                    let Some(at) = open.pop() else { break };
                    let arrow = tokens
                        .peek()
                        .is_some_and(|t| t.is(SyntaxKind::EqualsGreaterThanToken));
                    self.lambda_ahead.insert(at, arrow);
                    if open.is_empty() {
                        return Ok(arrow);
                    }
                }
                SyntaxKind::EndOfFileToken => break,
                _ => {}
            }
        }
        Err(self.stream.error(&messages::UNBALANCED_PARENTHESES, &[]))
    }

    /// `( type ) suffixes`
    fn parse_type_group(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_type_group");
        let mut group = ParseNode::new(SyntaxKind::TypeGroup);
        group.push(self.expect(SyntaxKind::OpenParenToken)?);
        group.push(self.parse_union_type()?);
        group.push(self.expect(SyntaxKind::CloseParenToken)?);
        self.parse_array_suffixes(&mut group)?;
        Ok(group)
    }

    /// `[<T>] ( [params] ) => return-type`
    fn parse_lambda_type(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_lambda_type");
        let mut lambda = ParseNode::new(SyntaxKind::LambdaType);
        if self.stream.at(SyntaxKind::LessThanToken) {
            lambda.push(self.parse_generic_parameter_pack()?);
        }
        self.parse_parameter_list(&mut lambda)?;
        lambda.push(self.expect(SyntaxKind::EqualsGreaterThanToken)?);
        lambda.push(self.parse_return_type()?);
        Ok(lambda)
    }

    /// `{ member* }`, members as in a class body.
    fn parse_anonymous_type(&mut self) -> ParseResult<ParseNode> {
        trace!(pos = %self.stream.position(), "parse_anonymous_type");
        let mut anonymous = ParseNode::new(SyntaxKind::AnonymousType);
        anonymous.push(self.expect(SyntaxKind::OpenBraceToken)?);
        while !self.at_list_end(SyntaxKind::CloseBraceToken)? {
            anonymous.push(self.parse_class_element()?);
        }
        anonymous.push(self.bump());
        Ok(anonymous)
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// `name (. name)*`
    fn parse_dot_id(&mut self) -> ParseResult<ParseNode> {
        let mut dot_id = ParseNode::new(SyntaxKind::DotId);
        dot_id.push(self.parse_identifier("an identifier")?);
        while self.stream.at(SyntaxKind::DotToken) && is_name(self.stream.peek_kind(1)) {
            dot_id.push(self.bump());
            dot_id.push(self.parse_identifier("an identifier")?);
        }
        Ok(dot_id)
    }

    /// A member, property or parameter name: any word, a string or a number.
    fn parse_element_key(&mut self) -> ParseResult<ParseNode> {
        if !is_element_key(self.stream.peek_kind(0)) {
            return Err(self.stream.unexpected("a property name"));
        }
        let mut key = self.bump();
        demote_to_identifier(&mut key);
        let mut elem = ParseNode::new(SyntaxKind::ElementKey);
        elem.push(key);
        Ok(elem)
    }
}

/// A union or intersection of a single member is that member.
fn collapse(mut node: ParseNode) -> ParseNode {
    if node.size() == 1 {
        if let Some(only) = node.children.pop() {
            return only;
        }
    }
    node
}
