use super::*;

fn parse_ok(source: &str) -> KtSyntaxNode {
    let (cst, errors) = parse_kotlin(source, SourceKind::File);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(cst.text().to_string(), source);
    cst
}

fn parse_script_ok(source: &str) -> KtSyntaxNode {
    let (cst, errors) = parse_kotlin(source, SourceKind::Script);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(cst.text().to_string(), source);
    cst
}

fn find(node: &KtSyntaxNode, kind: KtSyntaxKind) -> KtSyntaxNode {
    node.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind} in {node:#?}"))
}

fn child_kinds(node: &KtSyntaxNode) -> Vec<KtSyntaxKind> {
    node.children().map(|child| child.kind()).collect()
}

#[test]
fn test_empty_file() {
    let cst = parse_ok("");
    assert_eq!(cst.kind(), KtSyntaxKind::KtFile);
}

#[test]
fn test_package_and_imports() {
    let cst = parse_ok("package a.b\n\nimport a.b.C\nimport d.*\nimport e.F as G\n");
    let package = find(&cst, KtSyntaxKind::PackageDirective);
    assert_eq!(package.text().to_string(), "package a.b");

    let imports = find(&cst, KtSyntaxKind::ImportList);
    assert_eq!(imports.children().count(), 3);
    let alias = find(&imports, KtSyntaxKind::ImportAlias);
    assert_eq!(alias.text().to_string(), "as G");
}

#[test]
fn test_file_annotations() {
    let cst = parse_ok("@file:JvmName(\"Foo\")\npackage a\n");
    let list = find(&cst, KtSyntaxKind::FileAnnotationList);
    assert_eq!(child_kinds(&list), vec![KtSyntaxKind::AnnotationSet]);
}

#[test]
fn test_class_with_everything() {
    let source = "@Suppress(\"x\") data class Point<T : Any>(val x: Int, var y: T = 0) : Base(x), Marker, Api by impl where T : Comparable<T> {\n    init { println(x) }\n    constructor() : this(0, 0)\n}\n";
    let cst = parse_ok(source);
    let class = find(&cst, KtSyntaxKind::Class);
    assert_eq!(
        child_kinds(&class),
        vec![
            KtSyntaxKind::ModifierList,
            KtSyntaxKind::TypeParameterList,
            KtSyntaxKind::PrimaryConstructor,
            KtSyntaxKind::SuperTypeList,
            KtSyntaxKind::TypeConstraintList,
            KtSyntaxKind::ClassBody,
        ]
    );
    let supers = find(&class, KtSyntaxKind::SuperTypeList);
    assert_eq!(
        child_kinds(&supers),
        vec![
            KtSyntaxKind::SuperTypeCallEntry,
            KtSyntaxKind::SuperTypeEntry,
            KtSyntaxKind::DelegatedSuperTypeEntry,
        ]
    );
    find(&class, KtSyntaxKind::ClassInitializer);
    find(&class, KtSyntaxKind::ConstructorDelegationCall);
}

#[test]
fn test_enum_entries() {
    let cst = parse_ok("enum class Color(val rgb: Int) {\n    RED(1), GREEN(2) {\n        override fun x() = 1\n    };\n\n    fun hex() = rgb\n}\n");
    let body = find(&cst, KtSyntaxKind::ClassBody);
    let entries = body
        .children()
        .filter(|n| n.kind() == KtSyntaxKind::EnumEntry)
        .count();
    assert_eq!(entries, 2);
    assert!(body.children().any(|n| n.kind() == KtSyntaxKind::Fun));
}

#[test]
fn test_extension_function_and_property() {
    let cst = parse_ok("fun <T> List<T>.second(): T = this[1]\nval String.size get() = length\n");
    let fun = find(&cst, KtSyntaxKind::Fun);
    assert_eq!(
        child_kinds(&fun),
        vec![
            KtSyntaxKind::TypeParameterList,
            KtSyntaxKind::TypeReference,
            KtSyntaxKind::ValueParameterList,
            KtSyntaxKind::TypeReference,
            KtSyntaxKind::ArrayAccessExpression,
        ]
    );
    let property = find(&cst, KtSyntaxKind::Property);
    find(&property, KtSyntaxKind::PropertyAccessor);
}

#[test]
fn test_function_types() {
    let cst = parse_ok("val f: suspend Int.(String) -> Unit = {}\nval g: ((Int) -> Unit)? = null\nval h: context(A) () -> Unit = {}\n");
    let types: Vec<_> = cst
        .descendants()
        .filter(|n| n.kind() == KtSyntaxKind::FunctionType)
        .collect();
    assert_eq!(types.len(), 3);
    find(&types[0], KtSyntaxKind::FunctionTypeReceiver);
    find(&cst, KtSyntaxKind::NullableType);
    find(&cst, KtSyntaxKind::ContextReceiverList);
}

#[test]
fn test_spaced_parentheses_after_type_annotation_are_a_type() {
    let cst = parse_ok("val f: @Composable () -> Unit = {}\nval g: @A (@B Int) = 1\n");
    assert!(
        cst.descendants()
            .all(|n| n.kind() != KtSyntaxKind::ValueArgumentList)
    );
    find(&cst, KtSyntaxKind::FunctionType);
    find(&cst, KtSyntaxKind::ParenthesizedType);

    let cst = parse_ok("val h: @A() (Int) = 1\n");
    find(&cst, KtSyntaxKind::ValueArgumentList);
    find(&cst, KtSyntaxKind::ParenthesizedType);
}

#[test]
fn test_binary_precedence() {
    let cst = parse_script_ok("a + b * c\n");
    let outer = find(&cst, KtSyntaxKind::BinaryExpression);
    let kinds = child_kinds(&outer);
    assert_eq!(
        kinds,
        vec![
            KtSyntaxKind::ReferenceExpression,
            KtSyntaxKind::OperationReference,
            KtSyntaxKind::BinaryExpression,
        ]
    );
}

#[test]
fn test_newline_ends_statement() {
    let cst = parse_script_ok("val a = b\n-c\n");
    let script = cst;
    assert_eq!(
        child_kinds(&script),
        vec![
            KtSyntaxKind::ImportList,
            KtSyntaxKind::Property,
            KtSyntaxKind::PrefixExpression,
        ]
    );
}

#[test]
fn test_elvis_continues_on_next_line() {
    let cst = parse_script_ok("val a = b\n    ?: c\n");
    let property = find(&cst, KtSyntaxKind::Property);
    find(&property, KtSyntaxKind::BinaryExpression);
}

#[test]
fn test_calls_and_trailing_lambdas() {
    let cst = parse_script_ok("list.map { it * 2 }.filter(x) label@{ true }\nfoo<Int>()\n");
    let lambdas = cst
        .descendants()
        .filter(|n| n.kind() == KtSyntaxKind::LambdaArgument)
        .count();
    assert_eq!(lambdas, 2);
    find(&cst, KtSyntaxKind::LabeledExpression);
    find(&cst, KtSyntaxKind::TypeArgumentList);
}

#[test]
fn test_lambda_on_next_line_is_not_trailing() {
    let cst = parse_script_ok("foo()\n{ 1 }\n");
    assert!(
        cst.descendants()
            .all(|n| n.kind() != KtSyntaxKind::LambdaArgument)
    );
}

#[test]
fn test_lambda_parameters() {
    let cst = parse_script_ok("val f = { (a, b): Pair<Int, Int>, c -> a + b + c }\n");
    let params = find(&cst, KtSyntaxKind::LambdaParameterList);
    assert_eq!(
        child_kinds(&params),
        vec![
            KtSyntaxKind::DestructuringDeclaration,
            KtSyntaxKind::ValueParameter,
        ]
    );
}

#[test]
fn test_string_templates() {
    let cst = parse_script_ok("\"a $b ${c + 1} \\n \\u0041\"\n\"\"\"raw $x\"\"\"\n");
    let template = find(&cst, KtSyntaxKind::StringTemplate);
    assert_eq!(
        child_kinds(&template),
        vec![
            KtSyntaxKind::LiteralStringTemplateEntry,
            KtSyntaxKind::ShortStringTemplateEntry,
            KtSyntaxKind::LiteralStringTemplateEntry,
            KtSyntaxKind::LongStringTemplateEntry,
            KtSyntaxKind::LiteralStringTemplateEntry,
            KtSyntaxKind::EscapeStringTemplateEntry,
            KtSyntaxKind::LiteralStringTemplateEntry,
            KtSyntaxKind::EscapeStringTemplateEntry,
        ]
    );
}

#[test]
fn test_control_flow() {
    let source = "fun f(x: Any) {\n    if (x is String) return else println(x)\n    when (val y = x) {\n        in 1..2, is Int -> {}\n        !in list -> 1\n        else -> throw E()\n    }\n    try { a() } catch (e: Exception) { b() } finally { c() }\n    for ((i, v) in xs) continue\n    while (true) break\n    do { x++ } while (x < 10)\n    loop@ for (i in 0 until 10) break@loop\n}\n";
    let cst = parse_ok(source);
    for kind in [
        KtSyntaxKind::If,
        KtSyntaxKind::IsExpression,
        KtSyntaxKind::When,
        KtSyntaxKind::WhenConditionInRange,
        KtSyntaxKind::WhenConditionIsPattern,
        KtSyntaxKind::Try,
        KtSyntaxKind::Catch,
        KtSyntaxKind::Finally,
        KtSyntaxKind::For,
        KtSyntaxKind::While,
        KtSyntaxKind::DoWhile,
        KtSyntaxKind::LabeledExpression,
        KtSyntaxKind::LabelQualifier,
    ] {
        find(&cst, kind);
    }
}

#[test]
fn test_control_structures_with_empty_bodies() {
    let cst = parse_ok("fun f() {\n    if (x) ; else y()\n    for (i in x) ;\n    while (x) ;\n    do while (x)\n}\n");
    assert_eq!(
        child_kinds(&find(&cst, KtSyntaxKind::If)),
        vec![KtSyntaxKind::ReferenceExpression, KtSyntaxKind::CallExpression]
    );
    assert_eq!(
        child_kinds(&find(&cst, KtSyntaxKind::For)),
        vec![KtSyntaxKind::ValueParameter, KtSyntaxKind::ReferenceExpression]
    );
    assert_eq!(
        child_kinds(&find(&cst, KtSyntaxKind::DoWhile)),
        vec![KtSyntaxKind::ReferenceExpression]
    );
}

#[test]
fn test_callable_references_and_class_literals() {
    let cst = parse_script_ok("::println\nString::length\nList<Int>::size\nFoo::class.java\n");
    let references = cst
        .descendants()
        .filter(|n| n.kind() == KtSyntaxKind::CallableReferenceExpression)
        .count();
    assert_eq!(references, 3);
    find(&cst, KtSyntaxKind::ClassLiteralExpression);
}

#[test]
fn test_object_literal_and_anonymous_function() {
    let cst = parse_script_ok("val a = object : Runnable { override fun run() {} }\nval b = fun(x: Int): Int { return x }\n");
    find(&cst, KtSyntaxKind::ObjectLiteral);
    find(&cst, KtSyntaxKind::AnonymousFunction);
}

#[test]
fn test_comments_are_kept() {
    let source = "#!/usr/bin/env kotlin\n/* a /* nested */ b */\nfun main() { // trailing\n}\n";
    let cst = parse_ok(source);
    let comments = cst
        .descendants_with_tokens()
        .filter(|e| e.kind().is_comment())
        .count();
    assert_eq!(comments, 2);
}

#[test]
fn test_errors_keep_all_text() {
    let source = "fun (\nclass }\n";
    let (cst, errors) = parse_kotlin(source, SourceKind::File);
    assert!(!errors.is_empty());
    assert_eq!(cst.text().to_string(), source);
}

#[test]
fn test_semicolon_separated_statements() {
    let cst = parse_script_ok("a(); b()\n");
    let calls = cst
        .children()
        .filter(|n| n.kind() == KtSyntaxKind::CallExpression)
        .count();
    assert_eq!(calls, 2);
}

#[test]
fn test_same_line_statements_report_error() {
    let (_, errors) = parse_kotlin("val x = 1 val y = 2\n", SourceKind::Script);
    assert!(!errors.is_empty());
}
