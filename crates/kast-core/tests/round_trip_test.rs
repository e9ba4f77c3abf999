//! Round-trip tests over a corpus of Kotlin snippets

use kast_core::round_trip::{DifferenceKind, RoundTripValidator};
use kast_core::{KastParser, ParserConfiguration, Writer, WriterConfiguration};

/// One snippet per construct family, formatted the way people write them
const CORPUS: &[&str] = &[
    "",
    "package com.example.app // main package\n\nimport kotlin.math.*\nimport java.util.List as JList\n",
    "val x = \"\"\n",
    "val x = \"\" // x is empty\n",
    "var count: Int = 0\n    private set\n",
    "val answer by lazy { 42 }\n",
    "fun unpack() {\n    val (first, second) = pair\n}\n",
    "typealias Handler = (String) -> Unit\n",
    "class Empty\n",
    "data class Point(val x: Int, val y: Int = 0)\n",
    "class Box<out T : Any>(private val value: T) : Container<T>, Comparable<Box<T>> by delegate {\n    init {\n        require(value != null)\n    }\n\n    constructor() : this(default())\n}\n",
    "sealed interface Shape {\n    object Unit : Shape\n    companion object Factory {\n        fun create(): Shape = Unit\n    }\n}\n",
    "enum class Direction(val dx: Int) {\n    LEFT(-1), RIGHT(1);\n\n    fun flip() = if (this == LEFT) RIGHT else LEFT\n}\n",
    "abstract class Node {\n    abstract val children: List<Node>\n    open fun size(): Int = 1 + children.sumOf { it.size() }\n}\n",
    "fun <T> List<T>.second(): T? = getOrNull(1)\n",
    "fun delete(p: Array<out String>?) {}\n",
    "fun setup() { // do something\n }\n",
    "suspend fun load(vararg ids: Long, onDone: (Result<Unit>) -> Unit = {}) {\n    onDone(Result.success(Unit))\n}\n",
    "fun classify(x: Any?): String = when (x) {\n    null -> \"null\"\n    is Int, is Long -> \"number\"\n    in 'a'..'z' -> \"letter\"\n    !is String -> \"other\"\n    else -> \"string\"\n}\n",
    "fun loops() {\n    for (i in 0 until 10 step 2) println(i)\n    while (x > 0) x--\n    do {\n        x++\n    } while (x < 5)\n    outer@ for (row in rows) {\n        for (cell in row) if (cell == 0) continue@outer else break@outer\n    }\n}\n",
    "fun risky() = try {\n    parse()\n} catch (e: IllegalStateException) {\n    null\n} finally {\n    close()\n}\n",
    "val greeting = \"Hello, $name! You are ${age + 1} now\\n\\u00e9\"\n",
    "val raw = \"\"\"\n    |SELECT *\n    |FROM t WHERE a = $id\n\"\"\".trimMargin()\n",
    "val numbers = listOf(1, 0x1F, 2L, 3.5, 1e10, 2.5f, 'c', true, null)\n",
    "val refs = listOf(::println, String::length, Foo::class, this::toString)\n",
    "val cast = (value as? String)?.length ?: -1\n",
    "val check = x is String && !flag || y !in range\n",
    "val item = matrix[row][col] + array[i, j]\n",
    "val handler = object : Runnable {\n    override fun run() {\n        throw UnsupportedOperationException()\n    }\n}\n",
    "val fn = fun(x: Int): Int { return x * 2 }\n",
    "val sorted = items.sortedWith { a, b -> a.compareTo(b) }\n",
    "@Target(AnnotationTarget.FUNCTION)\nannotation class Marker\n\n@Marker @Suppress(\"UNUSED\") fun marked() = Unit\n",
    "fun <T> same(a: T, b: T): Boolean where T : Comparable<T>, T : Any = a == b\n",
    "/**\n * KDoc block\n */\nfun documented() = Unit /* trailing */ ; // after semicolon\n",
    "fun spaced ( a : Int ,b:Int )  =  a+b\n\n\n\nval   z=1\n",
    "fun main() {\r\n    println(\"crlf\")\r\n}\r\n",
    "val f: @Composable () -> Unit = {}\n",
    "val g: @A (@B Int) = 1\n",
    "fun empty() {\n    do while (x)\n    do /* a */ while /* b */ (y)\n    while (z) ;\n}\n",
    "fun tagged() {\n    foo @A lbl@{ }\n}\n",
];

fn lossless_parser() -> KastParser {
    KastParser::new(ParserConfiguration::file().lossless())
}

#[test]
fn test_corpus_round_trips_byte_for_byte() {
    let parser = lossless_parser();
    let writer = Writer::with_extras();
    for source in CORPUS {
        let root = parser
            .parse(source)
            .unwrap_or_else(|error| panic!("failed to parse {source:?}: {error}"));
        assert_eq!(&writer.write(&root), source, "lossless round trip");
    }
}

#[test]
fn test_script_round_trips_byte_for_byte() {
    let source = "#!/usr/bin/env kotlin\n\nimport java.io.File\n\nval dir = File(args[0])\nif (dir.isDirectory) {\n    dir.listFiles()?.forEach { println(it.name) }\n}\n";
    let parser = KastParser::new(ParserConfiguration::script().lossless());
    let root = parser.parse(source).unwrap();
    assert_eq!(Writer::with_extras().write(&root), source);
}

#[test]
fn test_default_output_keeps_the_structure() {
    let sources = [
        "package a.b\nimport x.y.*\nfun main() { println(\"hi\") }",
        "class Point( val x:Int,val y:Int ):Base(),Comparable<Point>{fun norm():Int=x*x+y*y}",
        "fun f(x: Any) = when(x){\nis String->\"s=${x.length}\"\n1,2->\"small\"\nelse->\"other\"}",
        "val xs = listOf(1,2).map{it*2}",
        "import a.b\n\nclass A<T>(private val t: T) {\n    val size = 1\n    fun f() = t?.let { it } ?: error(\"none\")\n}\n",
    ];
    let parser = KastParser::default();
    let writer = Writer::default();
    for source in sources {
        let tree = parser.parse(source).unwrap();
        let once = writer.write(&tree);
        let reparsed = parser
            .parse(&once)
            .unwrap_or_else(|error| panic!("default output {once:?} does not parse: {error}"));
        assert_eq!(reparsed, tree, "structure of {source:?}");
        assert_eq!(writer.write(&reparsed), once, "idempotence of {source:?}");
    }
}

#[test]
fn test_validator_accepts_clean_sources() {
    let validator = RoundTripValidator::new();
    for source in [
        "fun main() {\n    println(\"hi\") // greet\n}\n",
        "val xs = listOf(1, 2).map { it * 2 }\n",
    ] {
        let result = validator.validate(source).unwrap();
        assert!(result.is_valid(), "{source:?}: {:?}", result.issues());
        assert_eq!(result.lossless, source);
    }
}

#[test]
fn test_validator_reports_the_formatted_text() {
    let validator = RoundTripValidator::new().with_writer(WriterConfiguration {
        indent_size: 2,
        ..WriterConfiguration::default()
    });
    let result = validator
        .validate("fun  main( ) {   // start\n  g()\n}\n")
        .unwrap();
    assert!(result.is_valid(), "{:?}", result.issues());
    assert_eq!(result.formatted, "fun main() {\n  g()\n}\n");
    assert!(
        result
            .differences
            .iter()
            .all(|difference| difference.kind != DifferenceKind::TextDifference)
    );
}
