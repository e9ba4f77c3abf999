use std::borrow::Cow;

use tracing::trace;

use crate::ast::{AsNodeRef, FromNode, Node, NodeRef, Root};

/// A node and the chain of nodes above it
#[derive(Debug, Clone, Copy)]
pub struct NodePath<'p, 'a> {
    pub node: NodeRef<'a>,
    pub parent: Option<&'p NodePath<'p, 'a>>,
}

impl<'p, 'a> NodePath<'p, 'a> {
    pub fn root(node: NodeRef<'a>) -> Self {
        Self { node, parent: None }
    }

    /// Number of ancestors
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Ancestor nodes, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        std::iter::successors(self.parent, |path| path.parent).map(|path| path.node)
    }
}

/// Callback for a rewriting traversal
///
/// `pre_visit` runs before the children of a node are visited and may
/// replace the node; the children of the replacement are visited instead.
/// `post_visit` runs after the children, on the node as rebuilt so far.
///
/// A replacement must belong to the family its slot expects: an expression
/// may replace an expression, but not a type reference. Breaking this rule
/// panics.
pub trait MutableVisitor {
    fn pre_visit(&mut self, path: &NodePath<'_, '_>) -> Option<Node> {
        let _ = path;
        None
    }

    fn post_visit(&mut self, path: &NodePath<'_, '_>) -> Option<Node> {
        let _ = path;
        None
    }
}

/// Rewrite a root, borrowing it back when nothing changed
pub fn rewrite_root<'r>(root: &'r Root, visitor: &mut impl MutableVisitor) -> Cow<'r, Root> {
    rewrite(root, visitor)
}

/// Rewrite any node struct or family
pub fn rewrite<'r, T>(node: &'r T, visitor: &mut impl MutableVisitor) -> Cow<'r, T>
where
    T: AsNodeRef + FromNode + Clone,
{
    match visit(node.as_node_ref(), None, visitor) {
        Some(replacement) => {
            trace!(kind = replacement.kind_name(), "Rebuilt tree");
            Cow::Owned(T::from_node(replacement))
        }
        None => Cow::Borrowed(node),
    }
}

/// `Some` with the new node when it or anything below it changed
fn visit(
    node: NodeRef<'_>,
    parent: Option<&NodePath<'_, '_>>,
    visitor: &mut dyn MutableVisitor,
) -> Option<Node> {
    let replaced = visitor.pre_visit(&NodePath { node, parent });
    let current = replaced.as_ref().map_or(node, AsNodeRef::as_node_ref);

    let path = NodePath {
        node: current,
        parent,
    };
    let rebuilt = current.rewrite_children(&mut |child| visit(child, Some(&path), visitor));

    let changed = rebuilt.or(replaced);
    let current = changed.as_ref().map_or(node, AsNodeRef::as_node_ref);
    match visitor.post_visit(&NodePath {
        node: current,
        parent,
    }) {
        Some(replacement) => Some(replacement),
        None => changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConstantExpression, Declaration, Expression, Name};
    use crate::parser::{KastParser, parse_file};
    use crate::writer::Writer;

    struct Identity;

    impl MutableVisitor for Identity {}

    /// Renames every `Name` with the given text
    struct Rename(&'static str, &'static str);

    impl MutableVisitor for Rename {
        fn pre_visit(&mut self, path: &NodePath<'_, '_>) -> Option<Node> {
            match path.node {
                NodeRef::Name(name) if name.text == self.0 => Some(Node::from(Name {
                    text: self.1.to_string(),
                    extras: name.extras.clone(),
                })),
                _ => None,
            }
        }
    }

    #[test]
    fn test_identity_borrows_the_root() {
        let root = KastParser::default()
            .parse("class A { fun f(x: Int) = x + 1 }")
            .unwrap();
        let rewritten = rewrite_root(&root, &mut Identity);
        assert!(matches!(rewritten, Cow::Borrowed(_)));
        assert_eq!(*rewritten, root);
    }

    #[test]
    fn test_replacement_rebuilds_ancestors_only() {
        let root = KastParser::default()
            .parse("val a = x + 1\nval b = y")
            .unwrap();
        let rewritten = rewrite_root(&root, &mut Rename("x", "z"));
        let (Root::File(before), Root::File(after)) = (&root, rewritten.as_ref()) else {
            panic!("expected file roots");
        };
        assert_ne!(before.declarations[0], after.declarations[0]);
        assert_eq!(before.declarations[1], after.declarations[1]);
        assert_eq!(Writer::default().write(&rewritten), "val a = z + 1\n\nval b = y\n");
    }

    #[test]
    fn test_post_visit_sees_rebuilt_children() {
        struct Fold;

        impl MutableVisitor for Fold {
            fn post_visit(&mut self, path: &NodePath<'_, '_>) -> Option<Node> {
                let NodeRef::BinaryExpression(binary) = path.node else {
                    return None;
                };
                let (Expression::Constant(lhs), Expression::Constant(rhs)) =
                    (binary.lhs.as_ref(), binary.rhs.as_ref())
                else {
                    return None;
                };
                let sum = lhs.text.parse::<i64>().ok()? + rhs.text.parse::<i64>().ok()?;
                Some(Node::from(ConstantExpression {
                    kind: lhs.kind,
                    text: sum.to_string(),
                    extras: binary.extras.clone(),
                }))
            }
        }

        let file = parse_file("val x = 1 + 2 + 3").unwrap();
        let folded = rewrite(&file, &mut Fold);
        let Declaration::Property(property) = &folded.declarations[0] else {
            panic!("expected a property");
        };
        let Some(Expression::Constant(constant)) = property.initializer.as_deref() else {
            panic!("expected a folded constant");
        };
        assert_eq!(constant.text, "6");
    }

    #[test]
    fn test_path_tracks_ancestors() {
        struct Depths(Vec<(&'static str, usize)>);

        impl MutableVisitor for Depths {
            fn pre_visit(&mut self, path: &NodePath<'_, '_>) -> Option<Node> {
                self.0.push((path.node.kind_name(), path.depth()));
                None
            }
        }

        let file = parse_file("val x = 1").unwrap();
        let mut depths = Depths(Vec::new());
        rewrite(&file, &mut depths);
        assert_eq!(depths.0[0], ("File", 0));
        assert!(depths.0.contains(&("ConstantExpression", 2)));
    }

    #[test]
    #[should_panic(expected = "cannot stand in for")]
    fn test_wrong_family_panics() {
        struct Break;

        impl MutableVisitor for Break {
            fn pre_visit(&mut self, path: &NodePath<'_, '_>) -> Option<Node> {
                match path.node {
                    NodeRef::SingleVariable(_) => Some(Node::from(Name::new("oops"))),
                    _ => None,
                }
            }
        }

        let file = parse_file("val x = 1").unwrap();
        rewrite(&file, &mut Break);
    }
}
