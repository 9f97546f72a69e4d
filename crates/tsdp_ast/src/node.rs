//! The parse tree.
//!
//! A [`ParseNode`] is either a promoted leaf (a lexical token kind carrying
//! its source text) or a structural node built by a grammar rule, owning its
//! children in grammar order. Trees are built bottom-up: a production
//! creates an empty parent, appends each child as it is parsed, and returns
//! the parent by value.

use serde::{Deserialize, Serialize};
use tracing::trace;
use tsdp_core::text::{Position, TextSpan};

use crate::syntax_kind::SyntaxKind;

/// One node of the parse tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseNode {
    pub kind: SyntaxKind,
    /// Source text of a promoted leaf. Always `None` for structural nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Children in grammar order. Always empty for leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ParseNode>,
    /// Where a leaf came from. Not part of the tree's shape.
    #[serde(skip)]
    pub position: Option<(Position, TextSpan)>,
}

impl ParseNode {
    /// Create an empty structural node.
    pub fn new(kind: SyntaxKind) -> Self {
        debug_assert!(kind.is_node(), "{kind} is a terminal kind");
        Self {
            kind,
            text: None,
            children: Vec::new(),
            position: None,
        }
    }

    /// Create a promoted leaf.
    pub fn leaf(kind: SyntaxKind, text: impl Into<String>) -> Self {
        debug_assert!(kind.is_terminal(), "{kind} is a grammar kind");
        Self {
            kind,
            text: Some(text.into()),
            children: Vec::new(),
            position: None,
        }
    }

    /// Attach the source location of a leaf.
    pub fn with_position(mut self, position: Position, span: TextSpan) -> Self {
        self.position = Some((position, span));
        self
    }

    /// Append a child. Terminals never receive children.
    pub fn push(&mut self, child: ParseNode) {
        debug_assert!(self.kind.is_node(), "cannot expand terminal {}", self.kind);
        trace!(parent = %self.kind, kind = %child.kind, text = child.text(), "push");
        self.children.push(child);
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Leaf text, or the empty string for structural nodes.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// The child at `index`, if any.
    pub fn child(&self, index: usize) -> Option<&ParseNode> {
        self.children.get(index)
    }

    pub fn last(&self) -> Option<&ParseNode> {
        self.children.last()
    }

    /// Number of children.
    pub fn size(&self) -> usize {
        self.children.len()
    }

    /// Iterate over the direct children of the given kind.
    pub fn children_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &ParseNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// The first direct child of the given kind.
    pub fn find(&self, kind: SyntaxKind) -> Option<&ParseNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Whether two trees have the same kinds, leaf texts and child structure.
    ///
    /// Source positions are ignored.
    pub fn same_shape(&self, other: &ParseNode) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }
}

impl PartialEq for ParseNode {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other)
    }
}

impl Eq for ParseNode {}

/// Re-tag a contextual keyword leaf as an identifier.
///
/// Used where a production accepts "any word as a name" (element keys, type
/// alias names, dotted-name segments, generic parameter names). Hard reserved
/// words and non-keyword leaves are left untouched. Returns whether the node
/// was re-tagged.
pub fn demote_to_identifier(node: &mut ParseNode) -> bool {
    if node.kind.is_keyword() && !node.kind.is_reserved_word() {
        node.kind = SyntaxKind::Identifier;
        true
    } else {
        false
    }
}
