use insta::assert_snapshot;

use super::*;
use crate::ast::{
    AsNodeRef, Block, ConstantExpression, ConstantKind, Declaration, Expression, Extra, ExtraKind, FunctionBody,
    Keyword, KeywordKind, UnaryExpression,
};
use crate::parser::{KastParser, ParserConfiguration, parse_file, parse_file_lossless};

fn lossless(source: &str) -> String {
    let root = KastParser::new(ParserConfiguration::file().lossless())
        .parse(source)
        .unwrap();
    Writer::with_extras().write(&root)
}

fn lossless_script(source: &str) -> String {
    let root = KastParser::new(ParserConfiguration::script().lossless())
        .parse(source)
        .unwrap();
    Writer::with_extras().write(&root)
}

fn plain(source: &str) -> String {
    let root = KastParser::default().parse(source).unwrap();
    Writer::default().write(&root)
}

fn int(text: &str) -> Expression {
    Expression::Constant(ConstantExpression {
        kind: ConstantKind::Int,
        text: text.to_string(),
        extras: Extras::default(),
    })
}

fn minus(expression: Expression) -> Expression {
    Expression::Unary(UnaryExpression {
        operator: Keyword::new(KeywordKind::Minus),
        expression: Box::new(expression),
        prefix: true,
        extras: Extras::default(),
    })
}

// ==================
// Lossless mode
// ==================

#[test]
fn test_lossless_round_trip() {
    let sources = [
        "",
        "\n\n",
        "package a.b // pkg\n\nimport x.y.*\nimport x.z as Z\n",
        "val x = 1 ; val y = 2\n",
        "fun main() {\n    println(\"hi\")   // greet\n}\n",
        "class Point(val x: Int, val y: Int) : Base(), Comparable<Point> {\n    fun norm(): Int = x * x + y * y\n}\n",
        "fun f(x: Any) = when (x) {\n    is String -> \"s=${x.length}\"\n    1, 2 -> \"small\"\n    else -> \"other\"\n}\n",
        "val xs = listOf(1, 2).map { it * 2 }\n",
        "fun <T : Comparable<T>> max(a: T, b: T): T where T : Any {\n    return if (a > b) a else b\n}\n",
        "/** doc */\n@Suppress(\"x\")\nprivate inline fun f(block: () -> Unit) = block()\n",
        "val s = \"\"\"\n  raw $name \\u0041\n\"\"\"\n",
        "var count: Int = 0\n    private set\n",
        "enum class Color { RED, GREEN, ; fun next() = this }\n",
        "fun g() {\n    try { a() } catch (e: Exception) { } finally { b() }\n    for ((k, v) in map) continue\n}\n",
        "fun h() = loop@ while (true) { break@loop }\n",
        "val f: (suspend Int.(x: Int) -> String)? = null\n",
        "fun i() {\n    /* before */ x /* after */\n}\n",
    ];
    for source in sources {
        assert_eq!(lossless(source), source, "round trip of {source:?}");
    }
}

#[test]
fn test_lossless_script_round_trip() {
    let source = "#!/usr/bin/env kotlin\n\nimport java.io.File\n\nval f = File(\"a\")\nprintln(f.name)\n";
    assert_eq!(lossless_script(source), source);
}

#[test]
fn test_within_precedes_the_recorded_token() {
    let file = parse_file_lossless("fun f() { /* c */ }").unwrap();
    let Declaration::Function(function) = &file.declarations[0] else {
        panic!("expected a function");
    };
    let Some(FunctionBody::Block(block)) = &function.body else {
        panic!("expected a block body");
    };
    assert_eq!(block.extras.within_at, [1]);
    assert_eq!(Writer::with_extras().write_node(block.into()), "{ /* c */ }");
}

#[test]
fn test_within_past_the_last_token_goes_last() {
    let mut block = Block {
        statements: Vec::new(),
        extras: Extras::default(),
    };
    block.extras.within.push(Extra::new(ExtraKind::BlockComment, "/* c */"));
    block.extras.within_at = vec![5];
    assert_eq!(Writer::with_extras().write_node((&block).into()), "{}/* c */");
}

#[test]
fn test_lossless_writer_on_plain_tree_separates_words() {
    let file = parse_file("val x = 1").unwrap();
    let text = Writer::with_extras().write(&Root::File(file));
    assert_eq!(text, "val x=1");
}

// ==================
// Default mode
// ==================

#[test]
fn test_default_layout_of_a_function() {
    let text = plain("package a.b\nimport x.y.*\nfun main() { println(\"hi\") }");
    assert_snapshot!(text, @r#"
    package a.b

    import x.y.*

    fun main() {
        println("hi")
    }
    "#);
}

#[test]
fn test_default_layout_of_a_class() {
    let text = plain(
        "class Point( val x:Int,val y:Int ):Base(),Comparable<Point>{fun norm():Int=x*x+y*y}",
    );
    assert_snapshot!(text, @r"
    class Point(val x: Int, val y: Int) : Base(), Comparable<Point> {
        fun norm(): Int = x * x + y * y
    }
    ");
}

#[test]
fn test_default_layout_of_when() {
    let text = plain(
        "fun f(x: Any) = when(x){\nis String->\"s=${x.length}\"\n1,2->\"small\"\nelse->\"other\"}",
    );
    assert_snapshot!(text, @r#"
    fun f(x: Any) = when (x) {
        is String -> "s=${x.length}"
        1, 2 -> "small"
        else -> "other"
    }
    "#);
}

#[test]
fn test_default_layout_of_lambdas() {
    assert_eq!(
        plain("val xs = listOf(1,2).map{it*2}"),
        "val xs = listOf(1, 2).map { it * 2 }\n"
    );
    assert_eq!(plain("val f = {}"), "val f = {}\n");
    assert_eq!(plain("val f = { x: Int -> }"), "val f = { x: Int -> }\n");
}

#[test]
fn test_default_writer_separates_operators() {
    let expression = minus(minus(int("1")));
    let text = Writer::default().write_node(expression.as_node_ref());
    assert_eq!(text, "- -1");
}

#[test]
fn test_default_output_reparses_to_an_equal_tree() {
    let source = "import a.b\n\nclass A<T>(private val t: T) {\n    val size = 1\n    fun f() = t?.let { it } ?: error(\"none\")\n}\n";
    let tree = KastParser::default().parse(source).unwrap();
    let written = Writer::default().write(&tree);
    let reparsed = KastParser::default().parse(&written).unwrap();
    assert_eq!(reparsed, tree);
    assert_eq!(Writer::default().write(&reparsed), written);
}

#[test]
fn test_indent_size() {
    let writer = Writer::new(WriterConfiguration {
        indent_size: 2,
        ..WriterConfiguration::default()
    });
    let root = KastParser::default().parse("fun f() { g() }").unwrap();
    assert_eq!(writer.write(&root), "fun f() {\n  g()\n}\n");
}

#[test]
fn test_configuration_from_toml() {
    let config: WriterConfiguration = toml::from_str("extras = true").unwrap();
    assert_eq!(config, WriterConfiguration::lossless());
    assert_eq!(config.indent_size, 4);
}
