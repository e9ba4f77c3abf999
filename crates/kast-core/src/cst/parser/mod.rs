//! Recursive-descent parser building a lossless Kotlin CST
//!
//! The parser walks the token stream produced by [`lex_with_trivia`] and
//! feeds every token, trivia included, into a [`CstBuilder`]. Leading trivia
//! is flushed before a node starts so that node ranges begin at their first
//! significant token. Newlines are significant for statement termination
//! except inside parentheses, brackets and template entries.
//!
//! [`lex_with_trivia`]: super::lex_with_trivia

mod declarations;
mod expressions;
mod types;

use rowan::Checkpoint;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::lexer::{CstSpan, LexerError};
use super::{CstBuilder, CstToken, KtSyntaxKind, KtSyntaxNode};

/// Which root the parser produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A `.kt` file: package, imports, top-level declarations
    #[default]
    File,
    /// A `.kts` script: package, imports, statements
    Script,
}

/// Where a syntax error was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    Lexer,
    Parser,
}

/// An error reported by the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: CstSpan,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: CstSpan, kind: SyntaxErrorKind) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
        }
    }
}

impl From<LexerError> for SyntaxError {
    fn from(error: LexerError) -> Self {
        Self::new(error.message, error.span, SyntaxErrorKind::Lexer)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

/// Parse Kotlin source into a lossless CST
///
/// Lexer and parser errors are merged and ordered by position. The returned
/// tree always covers the whole input, even when errors were reported.
///
/// ```rust,ignore
/// use kast_core::cst::{parse_kotlin, SourceKind};
///
/// let source = "fun main() {\n    println(\"hi\") // greet\n}\n";
/// let (cst, errors) = parse_kotlin(source, SourceKind::File);
/// assert!(errors.is_empty());
/// assert_eq!(cst.text().to_string(), source);
/// ```
pub fn parse_kotlin(source: &str, kind: SourceKind) -> (KtSyntaxNode, Vec<SyntaxError>) {
    let (tokens, lexer_errors) = super::lex_with_trivia(source);

    let mut parser = Parser::new(&tokens);
    match kind {
        SourceKind::File => parser.parse_file(),
        SourceKind::Script => parser.parse_script(),
    }
    let (cst, parse_errors) = parser.finish();

    let mut errors: Vec<SyntaxError> = lexer_errors.into_iter().map(SyntaxError::from).collect();
    errors.extend(parse_errors);
    errors.sort_by_key(|error| error.span.start);
    (cst, errors)
}

/// Modifier words accepted in front of declarations
const DECLARATION_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "abstract",
    "final",
    "open",
    "sealed",
    "data",
    "enum",
    "annotation",
    "inner",
    "value",
    "companion",
    "lateinit",
    "override",
    "const",
    "inline",
    "noinline",
    "crossinline",
    "tailrec",
    "operator",
    "infix",
    "external",
    "suspend",
    "expect",
    "actual",
    "vararg",
];

/// Annotation use-site targets (`@get:Foo`)
const USE_SITE_TARGETS: &[&str] = &[
    "file", "field", "property", "get", "set", "receiver", "param", "setparam", "delegate",
];

/// Where a modifier list is being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModifierContext {
    Declaration,
    /// Type references: annotations and `suspend`
    Type,
    /// Type parameters and projections: `in`, `out`, `reified`
    Variance,
}

/// Token stream parser
struct Parser<'t> {
    tokens: &'t [CstToken],
    pos: usize,
    builder: CstBuilder,
    errors: Vec<SyntaxError>,
    /// Newlines do not terminate expressions (inside parentheses)
    newlines_ignored: bool,
    /// `{` on the same line starts a trailing lambda
    trailing_lambdas: bool,
    /// A `.` user types must not cross (receiver of a declaration)
    receiver_dot: Option<usize>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
            errors: Vec::new(),
            newlines_ignored: false,
            trailing_lambdas: true,
            receiver_dot: None,
        }
    }

    fn finish(self) -> (KtSyntaxNode, Vec<SyntaxError>) {
        (self.builder.finish(), self.errors)
    }

    // ==================
    // Roots
    // ==================

    fn parse_file(&mut self) {
        self.builder.start_node(KtSyntaxKind::KtFile);
        self.parse_preamble();

        while !self.at(KtSyntaxKind::Eof) {
            if self.eat(KtSyntaxKind::Semicolon) {
                continue;
            }
            let start = self.pos;
            if self.at_declaration_start(false) {
                self.parse_declaration(true);
            }
            if self.pos == start {
                self.error_bump("Expecting a top level declaration");
            }
        }

        self.flush_trivia();
        self.builder.finish_node();
    }

    fn parse_script(&mut self) {
        self.builder.start_node(KtSyntaxKind::Script);
        self.parse_preamble();
        self.parse_statements_until(KtSyntaxKind::Eof);
        self.flush_trivia();
        self.builder.finish_node();
    }

    /// File annotations, package directive and imports
    fn parse_preamble(&mut self) {
        if self.at_file_annotation() {
            self.start_node(KtSyntaxKind::FileAnnotationList);
            while self.at_file_annotation() {
                self.parse_annotation_set(ModifierContext::Declaration);
            }
            self.finish_node();
        }

        let after_modifiers = self.skip_modifiers(0, ModifierContext::Declaration);
        if self.nth(after_modifiers) == KtSyntaxKind::PackageKw {
            self.start_node(KtSyntaxKind::PackageDirective);
            self.parse_modifier_list(ModifierContext::Declaration);
            self.bump();
            self.parse_qualified_name();
            self.finish_node();
        }

        self.start_node(KtSyntaxKind::ImportList);
        while self.at_ident("import") {
            self.start_node(KtSyntaxKind::ImportDirective);
            self.bump_as(KtSyntaxKind::SoftKw);
            self.parse_qualified_name();
            if self.at(KtSyntaxKind::Dot) && self.nth(1) == KtSyntaxKind::Star {
                self.bump();
                self.bump();
            }
            if self.at(KtSyntaxKind::AsKw) {
                self.start_node(KtSyntaxKind::ImportAlias);
                self.bump();
                self.expect(KtSyntaxKind::Ident);
                self.finish_node();
            }
            self.finish_node();
            while self.eat(KtSyntaxKind::Semicolon) {}
        }
        self.finish_node();
    }

    fn at_file_annotation(&self) -> bool {
        self.at(KtSyntaxKind::At)
            && self.nth_is_ident(1, "file")
            && self.nth(2) == KtSyntaxKind::Colon
    }

    /// `a.b.c` as left-nested dot-qualified reference expressions
    fn parse_qualified_name(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_reference();
        while self.at(KtSyntaxKind::Dot) && self.nth(1) == KtSyntaxKind::Ident {
            self.start_node_at(checkpoint, KtSyntaxKind::DotQualifiedExpression);
            self.bump();
            self.parse_reference();
            self.finish_node();
        }
    }

    fn parse_reference(&mut self) {
        self.start_node(KtSyntaxKind::ReferenceExpression);
        self.expect(KtSyntaxKind::Ident);
        self.finish_node();
    }

    // ==================
    // Statements
    // ==================

    /// Statements separated by newlines or semicolons, up to `end`
    fn parse_statements_until(&mut self, end: KtSyntaxKind) {
        loop {
            while self.eat(KtSyntaxKind::Semicolon) {}
            if self.at(end) || self.at(KtSyntaxKind::Eof) {
                break;
            }

            let start = self.pos;
            self.parse_statement();
            if self.pos == start {
                self.error_bump("Expecting an element");
                continue;
            }

            if !(self.at(KtSyntaxKind::Semicolon)
                || self.at(end)
                || self.at(KtSyntaxKind::Eof)
                || self.newline_before_raw())
            {
                self.error("Unexpected tokens (use ';' to separate expressions on the same line)");
            }
        }
    }

    fn parse_statement(&mut self) {
        if self.at_declaration_start(true) {
            self.parse_declaration(false);
        } else {
            self.parse_expression_statement();
        }
    }

    /// An expression, optionally followed by an assignment
    fn parse_expression_statement(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_expression();
        if self.current().is_assignment() && !self.newline_before() {
            self.start_node_at(checkpoint, KtSyntaxKind::BinaryExpression);
            self.parse_operation_reference();
            self.parse_expression();
            self.finish_node();
        }
    }

    // ==================
    // Token access
    // ==================

    /// Raw index of the `n`-th significant token ahead
    fn nth_index(&self, n: usize) -> usize {
        let last = self.tokens.len().saturating_sub(1);
        let mut index = self.pos;
        let mut remaining = n;
        loop {
            while index < last && self.tokens[index].kind.is_trivia() {
                index += 1;
            }
            if remaining == 0 || index >= last {
                return index.min(last);
            }
            remaining -= 1;
            index += 1;
        }
    }

    fn nth(&self, n: usize) -> KtSyntaxKind {
        self.tokens
            .get(self.nth_index(n))
            .map_or(KtSyntaxKind::Eof, |token| token.kind)
    }

    fn nth_text(&self, n: usize) -> &'t str {
        let tokens = self.tokens;
        tokens
            .get(self.nth_index(n))
            .map_or("", |token| token.text.as_str())
    }

    fn nth_is_ident(&self, n: usize, text: &str) -> bool {
        self.nth(n) == KtSyntaxKind::Ident && self.nth_text(n) == text
    }

    fn current(&self) -> KtSyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: KtSyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_ident(&self, text: &str) -> bool {
        self.nth_is_ident(0, text)
    }

    /// The next raw token is `kind`, with no trivia in between
    fn at_adjacent(&self, kind: KtSyntaxKind) -> bool {
        self.tokens.get(self.pos).is_some_and(|token| token.kind == kind)
    }

    /// No trivia between the `n-1`-th and `n`-th significant tokens
    fn adjacent(&self, n: usize) -> bool {
        n > 0 && self.nth_index(n) == self.nth_index(n - 1) + 1
    }

    fn newline_before_index(&self, index: usize) -> bool {
        self.tokens[..index]
            .iter()
            .rev()
            .take_while(|token| token.kind.is_trivia())
            .any(|token| token.kind == KtSyntaxKind::Newline)
    }

    /// A newline precedes the current token and newlines are significant
    fn newline_before(&self) -> bool {
        !self.newlines_ignored && self.newline_before_raw()
    }

    fn newline_before_raw(&self) -> bool {
        self.newline_before_index(self.nth_index(0))
    }

    // ==================
    // Tree building
    // ==================

    fn flush_trivia(&mut self) {
        let tokens = self.tokens;
        while let Some(token) = tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.add_token(token);
            self.pos += 1;
        }
    }

    /// Add the current significant token (and the trivia before it)
    fn bump(&mut self) {
        self.flush_trivia();
        let tokens = self.tokens;
        if let Some(token) = tokens.get(self.pos)
            && token.kind != KtSyntaxKind::Eof
        {
            self.builder.add_token(token);
            self.pos += 1;
        }
    }

    /// Add the current token under a different kind (soft keywords)
    fn bump_as(&mut self, kind: KtSyntaxKind) {
        self.flush_trivia();
        let tokens = self.tokens;
        if let Some(token) = tokens.get(self.pos)
            && token.kind != KtSyntaxKind::Eof
        {
            self.builder.token(kind, &token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: KtSyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: KtSyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let found = self.current();
        self.error(format!("Expected {kind}, found {found}"));
        false
    }

    fn start_node(&mut self, kind: KtSyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: KtSyntaxKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn with_newlines_ignored<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.newlines_ignored, true);
        let result = f(self);
        self.newlines_ignored = saved;
        result
    }

    fn with_newlines_significant<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved_newlines = std::mem::replace(&mut self.newlines_ignored, false);
        let saved_lambdas = std::mem::replace(&mut self.trailing_lambdas, true);
        let result = f(self);
        self.newlines_ignored = saved_newlines;
        self.trailing_lambdas = saved_lambdas;
        result
    }

    // ==================
    // Errors
    // ==================

    fn error(&mut self, message: impl Into<String>) {
        let span = self
            .tokens
            .get(self.nth_index(0))
            .map_or(0..0, |token| token.span.clone());
        self.errors
            .push(SyntaxError::new(message, span, SyntaxErrorKind::Parser));
    }

    /// Report an error and wrap the current token in an error node
    fn error_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        if self.at(KtSyntaxKind::Eof) {
            return;
        }
        self.start_node(KtSyntaxKind::Error);
        self.bump();
        self.finish_node();
    }
}

impl KtSyntaxKind {
    fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::PlusEq | Self::MinusEq | Self::StarEq | Self::SlashEq | Self::PercentEq
        )
    }
}

#[cfg(test)]
mod tests;
