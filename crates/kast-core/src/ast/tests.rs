use super::*;

fn name(text: &str) -> Name {
    Name::new(text)
}

fn int(text: &str) -> Expression {
    Expression::Constant(ConstantExpression {
        kind: ConstantKind::Int,
        text: text.to_string(),
        extras: Extras::default(),
    })
}

fn plus(lhs: Expression, rhs: Expression) -> BinaryExpression {
    BinaryExpression {
        lhs: Box::new(lhs),
        operator: BinaryOperator::Token(Keyword::new(KeywordKind::Plus)),
        rhs: Box::new(rhs),
        extras: Extras::default(),
    }
}

#[test]
fn test_children_follow_field_order() {
    let binary = plus(Expression::Name(name("a")), int("1"));
    let children = NodeRef::from(&binary).children();
    let kinds: Vec<_> = children.iter().map(|child| child.kind_name()).collect();
    assert_eq!(kinds, vec!["Name", "Keyword", "ConstantExpression"]);
}

#[test]
fn test_containers_are_transparent() {
    let collection = CollectionLiteralExpression {
        expressions: CommaSeparatedNodeList::enclosed(vec![int("1"), int("2")], "[", "]"),
        extras: Extras::default(),
    };
    assert_eq!(NodeRef::from(&collection).children().len(), 2);
}

#[test]
fn test_equality_ignores_extras() {
    let mut left = name("x");
    left.extras.after.push(Extra::whitespace(" "));
    assert_eq!(left, name("x"));
    assert_ne!(left, name("y"));
}

#[test]
fn test_rewrite_replaces_only_matching_children() {
    let binary = plus(Expression::Name(name("a")), int("1"));
    let rewritten = NodeRef::from(&binary).rewrite_children(&mut |child| match child {
        NodeRef::ConstantExpression(_) => Some(Node::from(name("b"))),
        _ => None,
    });
    let Some(Node::BinaryExpression(rewritten)) = rewritten else {
        panic!("expected a rebuilt binary expression");
    };
    assert_eq!(*rewritten.lhs, Expression::Name(name("a")));
    assert_eq!(*rewritten.rhs, Expression::Name(name("b")));
}

#[test]
fn test_rewrite_without_changes_returns_none() {
    let binary = plus(Expression::Name(name("a")), int("1"));
    assert!(NodeRef::from(&binary).rewrite_children(&mut |_| None).is_none());
}

#[test]
fn test_family_accepts_any_member() {
    let statement = Statement::from_node(Node::from(name("x")));
    assert_eq!(statement, Statement::Expression(Expression::Name(name("x"))));

    let block = Block {
        statements: Vec::new(),
        extras: Extras::default(),
    };
    assert!(matches!(
        FunctionBody::from_node(Node::from(block.clone())),
        FunctionBody::Block(_)
    ));
    assert!(matches!(
        Expression::from_node(Node::from(block)),
        Expression::Block(_)
    ));
}

#[test]
fn test_family_rejects_foreign_node() {
    let keyword = Node::from(Keyword::new(KeywordKind::Val));
    assert!(Expression::try_from_node(keyword).is_err());
}

#[test]
#[should_panic(expected = "cannot stand in for")]
fn test_wrong_family_panics() {
    let _ = Type::from_node(Node::from(name("x")));
}

#[test]
fn test_parenthesized_type_children() {
    let inner = TypeRef {
        modifiers: Vec::new(),
        target: TypeRefTarget::Type(Type::Simple(SimpleType {
            pieces: vec![SimpleTypePiece {
                name: name("Int"),
                type_args: None,
                extras: Extras::default(),
            }],
            extras: Extras::default(),
        })),
        extras: Extras::default(),
    };
    let outer = TypeRef {
        modifiers: vec![Modifier::Keyword(Keyword::new(KeywordKind::Suspend))],
        target: TypeRefTarget::Parenthesized(Box::new(inner)),
        extras: Extras::default(),
    };
    let kinds: Vec<_> = NodeRef::from(&outer)
        .children()
        .iter()
        .map(|child| child.kind_name())
        .collect();
    assert_eq!(kinds, vec!["Keyword", "TypeRef"]);
}
