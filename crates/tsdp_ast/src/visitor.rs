//! Visitor trait for traversing the parse tree.
//!
//! The tree is uniform, so a visitor only needs two hooks: one for leaves
//! and one around structural nodes. Default implementations walk every child
//! in grammar order.

use crate::node::ParseNode;

pub trait Visitor {
    /// Called for every promoted leaf.
    fn visit_leaf(&mut self, _leaf: &ParseNode) {}

    /// Called before the children of a structural node. Returning `false`
    /// skips the subtree.
    fn enter_node(&mut self, _node: &ParseNode) -> bool {
        true
    }

    /// Called after the children of a structural node.
    fn leave_node(&mut self, _node: &ParseNode) {}
}

/// Walk `node` and its subtree depth-first.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, node: &ParseNode) {
    if node.is_terminal() {
        visitor.visit_leaf(node);
        return;
    }
    if visitor.enter_node(node) {
        for child in &node.children {
            walk(visitor, child);
        }
    }
    visitor.leave_node(node);
}
