//! End-to-end parse and write scenarios

use std::borrow::Cow;

use kast_core::ast::{
    Declaration, Expression, ExtraKind, File, FunctionBody, KeywordKind, Modifier, Type,
    TypeArgument, TypeRefTarget, Variable,
};
use kast_core::{
    ErrorKind, KastParser, MutableVisitor, ParserConfiguration, Root, Writer, parse_file,
    parse_file_lossless, rewrite_root,
};

fn lossless_root(source: &str) -> Root {
    KastParser::new(ParserConfiguration::file().lossless())
        .parse(source)
        .unwrap()
}

fn round_trip(source: &str) -> String {
    Writer::with_extras().write(&lossless_root(source))
}

fn kinds(extras: &[kast_core::Extra]) -> Vec<ExtraKind> {
    extras.iter().map(|extra| extra.kind).collect()
}

fn string_initializer(file: &File) -> &kast_core::ast::StringTemplate {
    let Declaration::Property(property) = &file.declarations[0] else {
        panic!("expected a property");
    };
    assert_eq!(property.val_or_var.kind, KeywordKind::Val);
    let Variable::Single(variable) = &property.variable else {
        panic!("expected a single variable");
    };
    assert_eq!(variable.name.text, "x");
    let Some(Expression::StringTemplate(template)) = property.initializer.as_deref() else {
        panic!("expected a string template");
    };
    template
}

#[test]
fn test_empty_string_property() {
    let file = parse_file("val x = \"\"").unwrap();
    assert!(string_initializer(&file).entries.is_empty());
    assert_eq!(round_trip("val x = \"\""), "val x = \"\"");
}

#[test]
fn test_trailing_comment_is_kept() {
    let source = "val x = \"\" // x is empty";
    let file = parse_file_lossless(source).unwrap();
    let template = string_initializer(&file);
    assert!(template.entries.is_empty());
    assert_eq!(
        kinds(&template.extras.after),
        [ExtraKind::Whitespace, ExtraKind::LineComment]
    );
    assert_eq!(template.extras.after[1].text, "// x is empty");
    assert_eq!(round_trip(source), source);

    // Equal to the plain tree, extras are not part of the structure
    assert_eq!(file, parse_file("val x = \"\"").unwrap());
}

#[test]
fn test_comment_only_block() {
    let source = "fun setup() { // do something\n }";
    let file = parse_file_lossless(source).unwrap();
    let Declaration::Function(function) = &file.declarations[0] else {
        panic!("expected a function");
    };
    let Some(FunctionBody::Block(block)) = &function.body else {
        panic!("expected a block body");
    };
    assert!(block.statements.is_empty());
    assert_eq!(
        kinds(&block.extras.within),
        [
            ExtraKind::Whitespace,
            ExtraKind::LineComment,
            ExtraKind::Whitespace
        ]
    );
    assert_eq!(round_trip(source), source);

    let formatted = Writer::default().write(&Root::File(file));
    assert_eq!(formatted, "fun setup() {}\n");
    assert!(KastParser::default().parse(&formatted).is_ok());
}

#[test]
fn test_nullable_array_of_out_projection() {
    let source = "fun delete(p: Array<out String>?) {}";
    let file = parse_file(source).unwrap();
    let Declaration::Function(function) = &file.declarations[0] else {
        panic!("expected a function");
    };
    let param = &function.params.elements[0];
    let type_ref = param.type_ref.as_ref().unwrap();
    let TypeRefTarget::Type(Type::Nullable(nullable)) = &type_ref.target else {
        panic!("expected a nullable type");
    };
    let TypeRefTarget::Type(Type::Simple(simple)) = &nullable.inner.target else {
        panic!("expected a simple type");
    };
    assert_eq!(simple.pieces[0].name.text, "Array");
    let args = simple.pieces[0].type_args.as_ref().unwrap();
    let [TypeArgument::Type(projection)] = args.elements.as_slice() else {
        panic!("expected one type projection");
    };
    assert!(matches!(
        projection.modifiers.as_slice(),
        [Modifier::Keyword(keyword)] if keyword.kind == KeywordKind::Out
    ));
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_two_trailing_lambdas_are_unsupported() {
    let error = KastParser::default()
        .parse("fun f() { g {} {} }")
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Unsupported);
    assert_eq!(
        error.to_string(),
        "Unsupported: at most one lambda argument is allowed"
    );
    assert!(error.is_recoverable());
}

#[test]
fn test_identity_rewrite_is_deep_equal() {
    struct Identity;
    impl MutableVisitor for Identity {}

    for source in [
        "val x = \"\" // x is empty\n",
        "class A<T>(val t: T) : B() {\n    fun f() = when (t) {\n        is String -> t.length\n        else -> 0\n    }\n}\n",
    ] {
        let root = lossless_root(source);
        let rewritten = rewrite_root(&root, &mut Identity);
        assert!(matches!(rewritten, Cow::Borrowed(_)));
        assert_eq!(*rewritten, root);
        assert_eq!(Writer::with_extras().write(&rewritten), source);
    }
}
