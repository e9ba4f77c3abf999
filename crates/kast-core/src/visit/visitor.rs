use crate::ast::{AsNodeRef, NodeRef, Root};

/// Callback for a read-only traversal
pub trait Visitor<'a> {
    /// Called once per node, before any of its children
    fn visit(&mut self, node: NodeRef<'a>, parent: Option<NodeRef<'a>>);
}

impl<'a, F> Visitor<'a> for F
where
    F: FnMut(NodeRef<'a>, Option<NodeRef<'a>>),
{
    fn visit(&mut self, node: NodeRef<'a>, parent: Option<NodeRef<'a>>) {
        self(node, parent);
    }
}

/// Visit a root and every node below it
pub fn walk_root<'a>(root: &'a Root, visitor: &mut impl Visitor<'a>) {
    walk(root.as_node_ref(), visitor);
}

/// Visit `node` and its descendants, depth-first in pre-order
///
/// Uses an explicit stack, so deeply nested trees do not exhaust the call
/// stack.
pub fn walk<'a>(node: NodeRef<'a>, visitor: &mut impl Visitor<'a>) {
    let mut stack = vec![(node, None)];
    while let Some((node, parent)) = stack.pop() {
        visitor.visit(node, parent);
        stack.extend(node.children().into_iter().rev().map(|child| (child, Some(node))));
    }
}
