//! Visitor and rewriting traversal over parsed trees

use std::collections::HashSet;

use insta::assert_snapshot;
use kast_core::ast::{Name, RegularStringEntry, StringEntry, StringTemplate};
use kast_core::{
    AsNodeRef, Extras, KastParser, MutableVisitor, Node, NodePath, NodeRef, ParserConfiguration,
    Root, SpanIndex, Writer, rewrite_root, walk_root,
};

const SOURCE: &str = r#"package demo

import kotlin.math.max

/** Running totals */
class Totals(private val values: List<Int>) {
    val total = values.sum()

    fun largest(limit: Int = 10): Int {
        var best = 0
        for (value in values) {
            if (value > limit) continue
            best = max(best, value)
        }
        return best
    }

    fun describe() = when {
        values.isEmpty() -> "empty"
        else -> "sum=${total}, first=${values.first()}"
    }
}
"#;

fn parse(source: &str) -> Root {
    KastParser::new(ParserConfiguration::file().lossless())
        .parse(source)
        .unwrap()
}

/// Key that tells nodes apart even where a child sits at its parent's address
fn identity(node: NodeRef<'_>) -> (&'static str, usize) {
    (node.kind_name(), node.as_ptr() as usize)
}

fn count_reachable(node: NodeRef<'_>) -> usize {
    1 + node.children().into_iter().map(count_reachable).sum::<usize>()
}

#[test]
fn test_walk_visits_every_reachable_node_once() {
    let root = parse(SOURCE);
    let mut seen = HashSet::new();
    let mut visits = 0;
    walk_root(&root, &mut |node: NodeRef<'_>, _: Option<NodeRef<'_>>| {
        visits += 1;
        assert!(seen.insert(identity(node)), "visited twice: {}", node.kind_name());
    });
    assert_eq!(visits, count_reachable(root.as_node_ref()));
    assert_eq!(seen.len(), visits);
}

#[test]
fn test_parents_contain_their_children() {
    let root = parse(SOURCE);
    walk_root(&root, &mut |node: NodeRef<'_>, parent: Option<NodeRef<'_>>| {
        if let Some(parent) = parent {
            let children: Vec<_> = parent.children().into_iter().map(identity).collect();
            assert!(children.contains(&identity(node)));
        }
    });
}

#[test]
fn test_span_index_locates_declarations() {
    let mut index = SpanIndex::new();
    KastParser::new(ParserConfiguration::file().lossless())
        .parse_with_hook(SOURCE, &mut index)
        .unwrap();
    assert_eq!(index.of_kind("FunctionDeclaration").count(), 2);

    let offset = SOURCE.find("largest").unwrap() as u32;
    let name = index.innermost_at(offset).unwrap();
    assert_eq!(name.kind, "Name");
    assert_eq!(&SOURCE[name.start as usize..name.end as usize], "largest");
}

/// Renames a function's name node and every reference to it
struct RenameFunction {
    from: &'static str,
    to: &'static str,
}

impl MutableVisitor for RenameFunction {
    fn pre_visit(&mut self, path: &NodePath<'_, '_>) -> Option<Node> {
        let NodeRef::Name(name) = path.node else {
            return None;
        };
        (name.text == self.from).then(|| {
            Node::from(Name {
                text: self.to.to_string(),
                extras: name.extras.clone(),
            })
        })
    }
}

#[test]
fn test_rename_keeps_formatting() {
    let root = parse(SOURCE);
    let rewritten = rewrite_root(
        &root,
        &mut RenameFunction {
            from: "largest",
            to: "highest",
        },
    );
    let text = Writer::with_extras().write(&rewritten);
    assert_eq!(text, SOURCE.replace("largest", "highest"));
}

/// Replaces string literals inside `when` expressions with `"redacted"`
struct Redact;

impl MutableVisitor for Redact {
    fn post_visit(&mut self, path: &NodePath<'_, '_>) -> Option<Node> {
        let NodeRef::StringTemplate(template) = path.node else {
            return None;
        };
        let in_when = path
            .ancestors()
            .any(|ancestor| matches!(ancestor, NodeRef::WhenExpression(_)));
        in_when.then(|| {
            Node::from(StringTemplate {
                entries: vec![StringEntry::Regular(RegularStringEntry {
                    text: "redacted".to_string(),
                    extras: Extras::default(),
                })],
                raw: false,
                extras: template.extras.clone(),
            })
        })
    }
}

#[test]
fn test_replacements_within_a_when() {
    let root = parse(SOURCE);
    let rewritten = rewrite_root(&root, &mut Redact);
    let formatted = Writer::default().write(&rewritten);
    assert_snapshot!(formatted, @r#"
    package demo

    import kotlin.math.max

    class Totals(private val values: List<Int>) {
        val total = values.sum()
        fun largest(limit: Int = 10): Int {
            var best = 0
            for (value in values) {
                if (value > limit) continue
                best = max(best, value)
            }
            return best
        }
        fun describe() = when {
            values.isEmpty() -> "redacted"
            else -> "redacted"
        }
    }
    "#);
}
