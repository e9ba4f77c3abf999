use super::*;
use crate::ast::{
    BinaryOperator, ConstantKind, Declaration, Expression, FunctionBody, KeywordKind, Modifier,
    PropertyDeclaration, Statement, Type, TypeArgument, TypeRefTarget, Variable,
};
use crate::cst::{CstBuilder, KtSyntaxKind, KtSyntaxNode, SourceKind, parse_kotlin};
use crate::error::ErrorKind;

fn convert(source: &str, extras: bool) -> Result<Root> {
    let (cst, errors) = parse_kotlin(source, SourceKind::File);
    assert!(errors.is_empty(), "syntax errors in {source:?}: {errors:?}");
    Converter::new(extras).convert(&cst)
}

fn file(source: &str, extras: bool) -> crate::ast::File {
    match convert(source, extras).unwrap() {
        Root::File(file) => file,
        Root::Script(_) => panic!("expected a file root"),
    }
}

fn first_property(file: &crate::ast::File) -> &PropertyDeclaration {
    match &file.declarations[0] {
        Declaration::Property(property) => property,
        other => panic!("expected a property, got {other:?}"),
    }
}

fn unsupported(source: &str) -> String {
    let error = convert(source, true).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Unsupported);
    error.to_string()
}

fn function_statements(source: &str, extras: bool) -> Vec<Statement> {
    let file = file(source, extras);
    match file.declarations.into_iter().next() {
        Some(Declaration::Function(function)) => match function.body {
            Some(FunctionBody::Block(block)) => block.statements,
            other => panic!("expected a block body, got {other:?}"),
        },
        other => panic!("expected a function, got {other:?}"),
    }
}

fn texts(extras: &[Extra]) -> Vec<(ExtraKind, &str)> {
    extras
        .iter()
        .map(|extra| (extra.kind, extra.text.as_str()))
        .collect()
}

// ==================
// Node shapes
// ==================

#[test]
fn test_empty_string_property() {
    let file = file("val x = \"\"", false);
    let property = first_property(&file);
    assert_eq!(property.val_or_var.kind, KeywordKind::Val);
    let Variable::Single(variable) = &property.variable else {
        panic!("expected a single variable");
    };
    assert_eq!(variable.name.text, "x");
    assert!(variable.type_ref.is_none());
    let Some(Expression::StringTemplate(template)) = property.initializer.as_deref() else {
        panic!("expected a string template");
    };
    assert!(template.entries.is_empty());
    assert!(!template.raw);
}

#[test]
fn test_nullable_array_of_out_projection() {
    let file = file("fun delete(p: Array<out String>?) {}", false);
    let Declaration::Function(function) = &file.declarations[0] else {
        panic!("expected a function");
    };
    let param = &function.params.elements[0];
    assert_eq!(param.name.text, "p");

    let type_ref = param.type_ref.as_ref().unwrap();
    let TypeRefTarget::Type(Type::Nullable(nullable)) = &type_ref.target else {
        panic!("expected a nullable type");
    };
    let TypeRefTarget::Type(Type::Simple(simple)) = &nullable.inner.target else {
        panic!("expected a simple type");
    };
    assert_eq!(simple.pieces.len(), 1);
    assert_eq!(simple.pieces[0].name.text, "Array");

    let args = simple.pieces[0].type_args.as_ref().unwrap();
    assert_eq!(args.len(), 1);
    let TypeArgument::Type(projection) = &args.elements[0] else {
        panic!("expected a type projection");
    };
    let [Modifier::Keyword(modifier)] = projection.modifiers.as_slice() else {
        panic!("expected one keyword modifier");
    };
    assert_eq!(modifier.kind, KeywordKind::Out);

    let Some(FunctionBody::Block(block)) = &function.body else {
        panic!("expected a block body");
    };
    assert!(block.statements.is_empty());
}

#[test]
fn test_dotted_names_flatten() {
    let file = file("package a.b.c\n\nimport x.y.Z as W\nimport x.y.*\n", false);
    let package = file.package_directive.as_ref().unwrap();
    let names: Vec<_> = package.names.iter().map(|name| name.text.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);

    let import = &file.import_directives[0];
    assert_eq!(import.names.len(), 3);
    assert_eq!(import.alias.as_ref().unwrap().name.text, "W");
    assert!(file.import_directives[1].wildcard);
}

#[test]
fn test_user_type_pieces_are_outermost_first() {
    let file = file("val x: a.b.C<Int>? = null", false);
    let property = first_property(&file);
    let Variable::Single(variable) = &property.variable else {
        panic!("expected a single variable");
    };
    let TypeRefTarget::Type(Type::Nullable(nullable)) = &variable.type_ref.as_ref().unwrap().target
    else {
        panic!("expected a nullable type");
    };
    let TypeRefTarget::Type(Type::Simple(simple)) = &nullable.inner.target else {
        panic!("expected a simple type");
    };
    let names: Vec<_> = simple.pieces.iter().map(|piece| piece.name.text.as_str()).collect();
    assert_eq!(names, ["a", "b", "C"]);
    assert!(simple.pieces[2].type_args.is_some());
    assert!(simple.pieces[0].type_args.is_none());
}

#[test]
fn test_parenthesized_type_keeps_nesting() {
    let file = file("val f: (() -> Unit)? = null", false);
    let property = first_property(&file);
    let Variable::Single(variable) = &property.variable else {
        panic!("expected a single variable");
    };
    let TypeRefTarget::Type(Type::Nullable(nullable)) = &variable.type_ref.as_ref().unwrap().target
    else {
        panic!("expected a nullable type");
    };
    let TypeRefTarget::Parenthesized(inner) = &nullable.inner.target else {
        panic!("expected parentheses");
    };
    assert!(matches!(inner.target, TypeRefTarget::Type(Type::Function(_))));
}

fn annotation_names(modifiers: &[Modifier]) -> Vec<&str> {
    modifiers
        .iter()
        .flat_map(|modifier| match modifier {
            Modifier::AnnotationSet(set) => set.annotations.elements.iter(),
            Modifier::Keyword(keyword) => panic!("expected an annotation, got {keyword:?}"),
        })
        .map(|annotation| {
            let TypeRefTarget::Type(Type::Simple(simple)) =
                &annotation.constructor_callee.type_ref.target
            else {
                panic!("expected a simple annotation type");
            };
            simple.pieces[0].name.text.as_str()
        })
        .collect()
}

#[test]
fn test_annotation_before_parenthesized_type_stays_outside() {
    let file = file("val g: @A (@B Int) = 1", true);
    let Variable::Single(variable) = &first_property(&file).variable else {
        panic!("expected a single variable");
    };
    let outer = variable.type_ref.as_ref().unwrap();
    assert_eq!(annotation_names(&outer.modifiers), ["A"]);
    let TypeRefTarget::Parenthesized(inner) = &outer.target else {
        panic!("expected parentheses");
    };
    assert_eq!(annotation_names(&inner.modifiers), ["B"]);
    assert!(matches!(inner.target, TypeRefTarget::Type(Type::Simple(_))));
    let Modifier::AnnotationSet(set) = &outer.modifiers[0] else {
        panic!("expected an annotation set");
    };
    assert!(set.annotations.elements[0].args.is_none());
}

#[test]
fn test_annotated_function_type() {
    let file = file("val f: @Composable () -> Unit = {}", false);
    let Variable::Single(variable) = &first_property(&file).variable else {
        panic!("expected a single variable");
    };
    let type_ref = variable.type_ref.as_ref().unwrap();
    assert_eq!(annotation_names(&type_ref.modifiers), ["Composable"]);
    let TypeRefTarget::Type(Type::Function(function)) = &type_ref.target else {
        panic!("expected a function type");
    };
    assert!(function.params.elements.is_empty());

    // Adjacent parentheses are still arguments
    let adjacent = self::file("val h: @A() (Int) = 1", false);
    let Variable::Single(variable) = &first_property(&adjacent).variable else {
        panic!("expected a single variable");
    };
    let type_ref = variable.type_ref.as_ref().unwrap();
    let Modifier::AnnotationSet(set) = &type_ref.modifiers[0] else {
        panic!("expected an annotation set");
    };
    assert!(set.annotations.elements[0].args.is_some());
    assert!(matches!(type_ref.target, TypeRefTarget::Parenthesized(_)));
}

#[test]
fn test_qualified_access_is_binary() {
    let file = file("val x = a.b?.c", false);
    let property = first_property(&file);
    let Some(Expression::Binary(outer)) = property.initializer.as_deref() else {
        panic!("expected a binary expression");
    };
    let BinaryOperator::Token(operator) = &outer.operator else {
        panic!("expected a token operator");
    };
    assert_eq!(operator.kind, KeywordKind::SafeDot);
    assert!(matches!(*outer.lhs, Expression::Binary(_)));
    assert!(matches!(*outer.rhs, Expression::Name(_)));
}

#[test]
fn test_infix_call_is_binary() {
    let file = file("val x = 1 shl 2", false);
    let property = first_property(&file);
    let Some(Expression::Binary(binary)) = property.initializer.as_deref() else {
        panic!("expected a binary expression");
    };
    let BinaryOperator::Infix(name) = &binary.operator else {
        panic!("expected an infix operator");
    };
    assert_eq!(name.text, "shl");
}

#[test]
fn test_constants_keep_raw_text() {
    let file = file("val a = 0x1FL\nval b = 'c'\nval c = true\nval d = null\nval e = 1.5e3f\n", false);
    let constants: Vec<_> = file
        .declarations
        .iter()
        .map(|declaration| match declaration {
            Declaration::Property(property) => match property.initializer.as_deref() {
                Some(Expression::Constant(constant)) => (constant.kind, constant.text.as_str()),
                other => panic!("expected a constant, got {other:?}"),
            },
            other => panic!("expected a property, got {other:?}"),
        })
        .collect();
    assert_eq!(
        constants,
        [
            (ConstantKind::Int, "0x1FL"),
            (ConstantKind::Char, "'c'"),
            (ConstantKind::Boolean, "true"),
            (ConstantKind::Null, "null"),
            (ConstantKind::Float, "1.5e3f"),
        ]
    );
}

#[test]
fn test_trailing_lambda_fills_lambda_arg() {
    let file = file("fun f() { run label@ { 1 } }", false);
    let Declaration::Function(function) = &file.declarations[0] else {
        panic!("expected a function");
    };
    let Some(FunctionBody::Block(block)) = &function.body else {
        panic!("expected a block body");
    };
    let Statement::Expression(Expression::Call(call)) = &block.statements[0] else {
        panic!("expected a call");
    };
    assert!(call.args.is_none());
    let lambda_arg = call.lambda_arg.as_ref().unwrap();
    assert_eq!(lambda_arg.label.as_ref().unwrap().text, "label");
    assert_eq!(lambda_arg.lambda.body.statements.len(), 1);
}

#[test]
fn test_annotated_labeled_lambda_argument_is_unwrapped() {
    let statements = function_statements("fun f() { foo @A lbl@{ } }", true);
    let Statement::Expression(Expression::Call(call)) = &statements[0] else {
        panic!("expected a call");
    };
    let lambda_arg = call.lambda_arg.as_ref().unwrap();
    assert_eq!(lambda_arg.label.as_ref().unwrap().text, "lbl");
    assert_eq!(lambda_arg.annotation_sets.len(), 1);
    let names: Vec<_> = lambda_arg.annotation_sets[0]
        .annotations
        .elements
        .iter()
        .map(|annotation| &annotation.constructor_callee.type_ref.target)
        .map(|target| match target {
            TypeRefTarget::Type(Type::Simple(simple)) => simple.pieces[0].name.text.as_str(),
            other => panic!("expected a simple type, got {other:?}"),
        })
        .collect();
    assert_eq!(names, ["A"]);
    assert!(lambda_arg.lambda.body.statements.is_empty());
}

// ==================
// Unsupported constructs
// ==================

#[test]
fn test_two_lambda_arguments_are_unsupported() {
    assert_eq!(
        unsupported("fun f() { g {} {} }"),
        "Unsupported: at most one lambda argument is allowed"
    );
}

#[test]
fn test_type_parameters_after_name_are_unsupported() {
    assert_eq!(
        unsupported("fun f<T>() {}"),
        "Unsupported: type parameters after function name"
    );
}

#[test]
fn test_destructuring_when_subject_is_unsupported() {
    assert_eq!(
        unsupported("fun f() = when (val (a, b) = p) { else -> 1 }"),
        "Unsupported: destructuring declaration as when-subject"
    );
}

#[test]
fn test_package_directive_with_modifiers_is_unsupported() {
    assert_eq!(
        unsupported("@A package a"),
        "Unsupported: package directive with modifiers"
    );
}

#[test]
fn test_empty_control_bodies() {
    assert_eq!(
        unsupported("fun f() { if (x) ; else y() }"),
        "Unsupported: if expression without a then-branch"
    );
    assert_eq!(
        unsupported("fun f() { if (x) y() else ; }"),
        "Unsupported: if expression with an empty else-branch"
    );
    assert_eq!(
        unsupported("fun f() { for (i in x) ; }"),
        "Unsupported: for loop without a body"
    );

    let statements = function_statements("fun f() { while (x) ; }", false);
    let Statement::Expression(Expression::While(while_loop)) = &statements[0] else {
        panic!("expected a while loop");
    };
    assert!(while_loop.body.is_none());
    assert!(!while_loop.do_while);
}

#[test]
fn test_lambda_argument_must_be_a_lambda() {
    let (cst, errors) = parse_kotlin("val x = foo {}", SourceKind::File);
    assert!(errors.is_empty());
    let lambda = cst
        .descendants()
        .find(|node| node.kind() == KtSyntaxKind::LambdaExpression)
        .unwrap();

    let mut builder = CstBuilder::new();
    builder.start_node(KtSyntaxKind::ReferenceExpression);
    builder.token(KtSyntaxKind::Ident, "bar");
    builder.finish_node();
    let replacement = builder.finish().green().into_owned();
    let edited = KtSyntaxNode::new_root(lambda.replace_with(replacement));
    assert_eq!(edited.to_string(), "val x = foo bar");

    let error = Converter::new(true).convert(&edited).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Unsupported);
    assert_eq!(
        error.to_string(),
        "Unsupported: lambda argument must be a lambda expression"
    );
}

// ==================
// Extras
// ==================

#[test]
fn test_plain_mode_records_nothing() {
    let file = file("// a\nval x = \"\" // b\n", false);
    assert!(file.extras.is_empty());
    let property = first_property(&file);
    assert!(property.extras.is_empty());
    let Some(Expression::StringTemplate(template)) = property.initializer.as_deref() else {
        panic!("expected a string template");
    };
    assert!(template.extras.is_empty());
}

#[test]
fn test_leading_trivia_is_before_the_root() {
    let file = file("// header\n\nval x = 1", true);
    assert_eq!(
        texts(&file.extras.before),
        [
            (ExtraKind::LineComment, "// header"),
            (ExtraKind::Whitespace, "\n\n"),
        ]
    );
}

#[test]
fn test_trailing_comment_is_after_the_earlier_node() {
    let file = file("val x = \"\" // x is empty", true);
    let property = first_property(&file);
    let Some(Expression::StringTemplate(template)) = property.initializer.as_deref() else {
        panic!("expected a string template");
    };
    assert_eq!(
        texts(&template.extras.after),
        [
            (ExtraKind::Whitespace, " "),
            (ExtraKind::LineComment, "// x is empty"),
        ]
    );
    assert!(property.extras.after.is_empty());
}

#[test]
fn test_trivia_between_siblings_goes_to_the_earlier_one() {
    let file = file("val x = 1\nval y = 2", true);
    let property = first_property(&file);
    let Some(Expression::Constant(constant)) = property.initializer.as_deref() else {
        panic!("expected a constant");
    };
    assert_eq!(texts(&constant.extras.after), [(ExtraKind::Whitespace, "\n")]);
    let Declaration::Property(second) = &file.declarations[1] else {
        panic!("expected a property");
    };
    assert!(second.extras.before.is_empty());
}

#[test]
fn test_comment_only_block_keeps_within() {
    let file = file("fun setup() { // do something\n }", true);
    let Declaration::Function(function) = &file.declarations[0] else {
        panic!("expected a function");
    };
    let Some(FunctionBody::Block(block)) = &function.body else {
        panic!("expected a block body");
    };
    assert!(block.statements.is_empty());
    assert_eq!(
        texts(&block.extras.within),
        [
            (ExtraKind::Whitespace, " "),
            (ExtraKind::LineComment, "// do something"),
            (ExtraKind::Whitespace, "\n "),
        ]
    );
    assert_eq!(block.extras.within_at, [1, 1, 1]);
}

#[test]
fn test_empty_do_while_keeps_both_gaps() {
    let statements = function_statements("fun f() { do /* a */ while (x) }", true);
    let Statement::Expression(Expression::While(while_loop)) = &statements[0] else {
        panic!("expected a do-while loop");
    };
    assert!(while_loop.do_while);
    assert!(while_loop.body.is_none());
    assert_eq!(
        texts(&while_loop.extras.within),
        [
            (ExtraKind::Whitespace, " "),
            (ExtraKind::BlockComment, "/* a */"),
            (ExtraKind::Whitespace, " "),
            (ExtraKind::Whitespace, " "),
        ]
    );
    assert_eq!(while_loop.extras.within_at, [1, 1, 1, 2]);
}

#[test]
fn test_semicolons_are_extras() {
    let file = file("val x = 1; val y = 2", true);
    let property = first_property(&file);
    let Some(Expression::Constant(constant)) = property.initializer.as_deref() else {
        panic!("expected a constant");
    };
    assert_eq!(
        texts(&constant.extras.after),
        [(ExtraKind::Semicolon, ";"), (ExtraKind::Whitespace, " ")]
    );
}

// ==================
// Hooks
// ==================

#[test]
fn test_span_index_records_every_node() {
    let source = "val x = 1";
    let (cst, _) = parse_kotlin(source, SourceKind::File);
    let mut index = SpanIndex::new();
    Converter::new(false)
        .with_hook(&mut index)
        .convert(&cst)
        .unwrap();

    let constant = index.of_kind("ConstantExpression").next().unwrap();
    assert_eq!((constant.start, constant.end), (8, 9));
    assert_eq!(index.innermost_at(4).map(|entry| entry.kind), Some("Name"));
    assert_eq!(index.entries().last().map(|entry| entry.kind), Some("File"));
    assert!(!index.is_empty());
}
