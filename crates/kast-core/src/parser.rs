use std::fmt;
use std::ops::Range;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{File, Root, Script};
use crate::convert::{ConvertHook, Converter};
use crate::cst::{KtSyntaxNode, SourceKind, SyntaxError, SyntaxErrorKind, parse_kotlin};
use crate::error::KastError;
use crate::result::Result;

/// How source text is parsed into nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfiguration {
    /// File or script root
    pub source_kind: SourceKind,
    /// Keep whitespace, comments and semicolons as node extras
    pub lossless: bool,
}

impl ParserConfiguration {
    pub fn file() -> Self {
        Self::default()
    }

    pub fn script() -> Self {
        Self {
            source_kind: SourceKind::Script,
            ..Self::default()
        }
    }

    pub fn lossless(mut self) -> Self {
        self.lossless = true;
        self
    }
}

/// Source text to [`Root`] parser
///
/// Stateless apart from its configuration, so one parser can be shared
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct KastParser {
    config: ParserConfiguration,
}

impl KastParser {
    pub fn new(config: ParserConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfiguration {
        &self.config
    }

    /// Parse `source` into a node tree
    pub fn parse(&self, source: &str) -> Result<Root> {
        self.convert(None, source, None)
    }

    /// Parse `source` read from `name`, which only labels diagnostics
    pub fn parse_named(&self, name: &str, source: &str) -> Result<Root> {
        self.convert(Some(name), source, None)
    }

    /// Parse `source`, reporting every created node to `hook`
    pub fn parse_with_hook(&self, source: &str, hook: &mut dyn ConvertHook) -> Result<Root> {
        self.convert(None, source, Some(hook))
    }

    /// Parse `source` into the lossless CST only
    ///
    /// Fails when the front-end reported any diagnostic.
    pub fn parse_cst(&self, source: &str) -> Result<KtSyntaxNode> {
        self.cst(None, source)
    }

    fn cst(&self, name: Option<&str>, source: &str) -> Result<KtSyntaxNode> {
        let started = Instant::now();
        let (cst, errors) = parse_kotlin(source, self.config.source_kind);
        debug!(
            file = name.unwrap_or("<source>"),
            bytes = source.len(),
            errors = errors.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Parsed CST"
        );
        if !errors.is_empty() {
            let diagnostics = errors
                .iter()
                .map(|error| {
                    let diagnostic = Diagnostic::from_syntax_error(source, error);
                    match name {
                        Some(name) => diagnostic.in_file(name),
                        None => diagnostic,
                    }
                })
                .collect();
            return Err(KastError::parse_error(diagnostics));
        }
        Ok(cst)
    }

    fn convert(
        &self,
        name: Option<&str>,
        source: &str,
        hook: Option<&mut dyn ConvertHook>,
    ) -> Result<Root> {
        let cst = self.cst(name, source)?;
        let started = Instant::now();
        let converter = Converter::new(self.config.lossless);
        let root = match hook {
            Some(hook) => converter.with_hook(hook).convert(&cst)?,
            None => converter.convert(&cst)?,
        };
        debug!(
            lossless = self.config.lossless,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Converted source"
        );
        Ok(root)
    }
}

/// Parse a `.kt` file without extras
pub fn parse_file(source: &str) -> Result<File> {
    match KastParser::new(ParserConfiguration::file()).parse(source)? {
        Root::File(file) => Ok(file),
        Root::Script(_) => Err(KastError::unsupported("expected a file root")),
    }
}

/// Parse a `.kt` file keeping every extra
pub fn parse_file_lossless(source: &str) -> Result<File> {
    match KastParser::new(ParserConfiguration::file().lossless()).parse(source)? {
        Root::File(file) => Ok(file),
        Root::Script(_) => Err(KastError::unsupported("expected a file root")),
    }
}

/// Parse a `.kts` script without extras
pub fn parse_script(source: &str) -> Result<Script> {
    match KastParser::new(ParserConfiguration::script()).parse(source)? {
        Root::Script(script) => Ok(script),
        Root::File(_) => Err(KastError::unsupported("expected a script root")),
    }
}

/// A lexer or parser error located in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name the source was parsed under, if any
    pub file: Option<String>,
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
    pub offset: usize,
    pub length: usize,
    pub span: Range<usize>,
    pub kind: SyntaxErrorKind,
}

impl Diagnostic {
    /// A parser diagnostic at `offset` spanning `length` bytes of `source`
    pub fn at(message: impl Into<String>, source: &str, offset: usize, length: usize) -> Self {
        let (line, column) = offset_to_line_col(source, offset);
        Self {
            file: None,
            message: message.into(),
            line,
            column,
            offset,
            length,
            span: offset..offset + length,
            kind: SyntaxErrorKind::Parser,
        }
    }

    pub fn from_syntax_error(source: &str, error: &SyntaxError) -> Self {
        let length = error.span.end.saturating_sub(error.span.start);
        Self {
            kind: error.kind,
            ..Self::at(error.message.clone(), source, error.span.start, length)
        }
    }

    /// Label the diagnostic with the name of its source
    pub fn in_file(mut self, name: impl Into<String>) -> Self {
        self.file = Some(name.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}:")?;
        }
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1usize;
    let mut column = 1usize;
    let mut current = 0usize;

    for ch in source.chars() {
        if current >= offset {
            break;
        }

        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }

        current += ch.len_utf8();
    }

    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Declaration;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_file() {
        let file = parse_file("package a.b\n\nfun main() {}\n").unwrap();
        assert_eq!(file.declarations.len(), 1);
        assert!(matches!(file.declarations[0], Declaration::Function(_)));
    }

    #[test]
    fn test_parse_script() {
        let script = parse_script("val x = 1\nprintln(x)\n").unwrap();
        assert_eq!(script.statements.len(), 2);
    }

    #[test]
    fn test_plain_mode_drops_extras() {
        let file = parse_file("// header\nval x = 1 // one\n").unwrap();
        assert!(file.extras.is_empty());
        let Declaration::Property(property) = &file.declarations[0] else {
            panic!("expected a property");
        };
        assert!(property.extras.is_empty());
    }

    #[test]
    fn test_lossless_mode_keeps_extras() {
        let file = parse_file_lossless("// header\nval x = 1\n").unwrap();
        let text: String = file
            .extras
            .before
            .iter()
            .map(|extra| extra.text.as_str())
            .collect();
        assert_eq!(text, "// header\n");
    }

    #[test]
    fn test_parse_error_carries_all_diagnostics() {
        let error = parse_file("val x =\nfun (").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse);
        assert!(!error.diagnostics().is_empty());
        let first = &error.diagnostics()[0];
        assert_eq!(first.kind, SyntaxErrorKind::Parser);
        assert!(first.line >= 1);
    }

    #[test]
    fn test_parse_cst_is_lossless() {
        let source = "fun f() = 1 ; // x\n";
        let cst = KastParser::default().parse_cst(source).unwrap();
        assert_eq!(cst.text().to_string(), source);
    }

    #[test]
    fn test_parse_with_hook_sees_every_node() {
        let mut kinds = Vec::new();
        let mut hook = |node: crate::ast::NodeRef<'_>, _: &crate::cst::KtSyntaxElement| {
            kinds.push(node.kind_name());
        };
        KastParser::default()
            .parse_with_hook("val x = 1", &mut hook)
            .unwrap();
        assert!(kinds.contains(&"PropertyDeclaration"));
        assert!(kinds.contains(&"ConstantExpression"));
        assert_eq!(kinds.last(), Some(&"File"));
    }

    #[test]
    fn test_diagnostic_position() {
        let diagnostic = Diagnostic::at("Expecting an expression", "val x =", 7, 0);
        assert_eq!((diagnostic.line, diagnostic.column), (1, 8));
        assert_eq!(diagnostic.to_string(), "1:8: Expecting an expression");

        let diagnostic = Diagnostic::at("Unexpected token", "a\nbc d", 5, 1);
        assert_eq!((diagnostic.line, diagnostic.column), (2, 4));
        assert_eq!(diagnostic.span, 5..6);
    }

    #[test]
    fn test_named_source_labels_diagnostics() {
        let error = KastParser::default()
            .parse_named("src/Main.kt", "val x =\n")
            .unwrap_err();
        let first = &error.diagnostics()[0];
        assert_eq!(first.file.as_deref(), Some("src/Main.kt"));
        assert!(first.to_string().starts_with("src/Main.kt:"), "{first}");
        assert!(error.to_string().starts_with("Parse error: src/Main.kt:"));

        let error = KastParser::default().parse("val x =\n").unwrap_err();
        assert_eq!(error.diagnostics()[0].file, None);
    }

    #[test]
    fn test_syntax_error_keeps_its_kind() {
        let error = SyntaxError::new("Unterminated string", 4..7, SyntaxErrorKind::Lexer);
        let diagnostic = Diagnostic::from_syntax_error("x = \"ab", &error).in_file("a.kt");
        assert_eq!(diagnostic.kind, SyntaxErrorKind::Lexer);
        assert_eq!((diagnostic.offset, diagnostic.length), (4, 3));
        assert_eq!(diagnostic.to_string(), "a.kt:1:5: Unterminated string");
    }

    #[test]
    fn test_configuration_from_toml() {
        let config: ParserConfiguration =
            toml::from_str("source_kind = \"script\"\nlossless = true\n").unwrap();
        assert_eq!(config, ParserConfiguration::script().lossless());
    }
}
