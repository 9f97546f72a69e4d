//! tsdp_printer: Parse tree to text output.
//!
//! Two serializations of a finished tree:
//! - [`print_code`] rebuilds declaration source by joining leaf texts with
//!   single spaces. Newline leaves are written as line breaks so that
//!   newline-terminated statements still parse the same way.
//! - [`to_json`] / [`from_json`] give a structural dump, one object per node.

use tsdp_ast::{walk, ParseNode, SyntaxKind, Visitor};

/// Rebuild source text from a parse tree.
///
/// Union and intersection nodes do not keep their `|` and `&` separators,
/// so the printer writes them back between alternatives.
pub fn print_code(node: &ParseNode) -> String {
    let mut printer = CodePrinter::default();
    walk(&mut printer, node);
    printer.output
}

/// Serialize a tree as JSON. Leaves are `{"kind", "text"}` and structural
/// nodes `{"kind", "children"}`; an empty child list is omitted.
pub fn to_json(node: &ParseNode, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(node)
    } else {
        serde_json::to_string(node)
    }
}

/// Read back a tree written by [`to_json`]. Source positions are not part of
/// the dump and come back empty.
pub fn from_json(json: &str) -> serde_json::Result<ParseNode> {
    serde_json::from_str(json)
}

#[derive(Default)]
struct CodePrinter {
    output: String,
    /// For each open structural node: its kind and how many children have
    /// been printed so far.
    open: Vec<(SyntaxKind, usize)>,
}

impl CodePrinter {
    fn needs_space(&self) -> bool {
        !self.output.is_empty() && !self.output.ends_with('\n')
    }

    /// Write the separator owed before the next child of a union or
    /// intersection.
    fn before_child(&mut self) {
        let Some((kind, printed)) = self.open.last_mut() else {
            return;
        };
        let separator = match kind {
            SyntaxKind::UnionType => Some('|'),
            SyntaxKind::IntersectionType => Some('&'),
            _ => None,
        };
        let first = *printed == 0;
        *printed += 1;
        if let (Some(separator), false) = (separator, first) {
            if self.needs_space() {
                self.output.push(' ');
            }
            self.output.push(separator);
        }
    }
}

impl Visitor for CodePrinter {
    fn visit_leaf(&mut self, leaf: &ParseNode) {
        self.before_child();
        if leaf.kind == SyntaxKind::NewLineToken {
            self.output.push('\n');
            return;
        }
        if self.needs_space() {
            self.output.push(' ');
        }
        self.output.push_str(leaf.text());
    }

    fn enter_node(&mut self, node: &ParseNode) -> bool {
        self.before_child();
        self.open.push((node.kind, 0));
        true
    }

    fn leave_node(&mut self, _node: &ParseNode) {
        self.open.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: SyntaxKind, text: &str) -> ParseNode {
        ParseNode::leaf(kind, text)
    }

    #[test]
    fn test_union_separators_are_restored() {
        let mut union = ParseNode::new(SyntaxKind::UnionType);
        union.push(leaf(SyntaxKind::StringLiteral, "'a'"));
        let mut both = ParseNode::new(SyntaxKind::IntersectionType);
        both.push(leaf(SyntaxKind::Identifier, "B"));
        both.push(leaf(SyntaxKind::Identifier, "C"));
        union.push(both);
        assert_eq!(print_code(&union), "'a' | B & C");
    }

    #[test]
    fn test_newline_leaf_breaks_the_line() {
        let mut var = ParseNode::new(SyntaxKind::GlobalVariable);
        var.push(leaf(SyntaxKind::VarKeyword, "var"));
        var.push(leaf(SyntaxKind::NewLineToken, "\n"));
        var.push(leaf(SyntaxKind::Identifier, "x"));
        assert_eq!(print_code(&var), "var\nx");
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(print_code(&ParseNode::new(SyntaxKind::File)), "");
    }
}
