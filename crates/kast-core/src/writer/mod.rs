//! Node tree to source text
//!
//! The writer has two modes:
//!
//! - **Default**: tokens of every node with the few separators needed to
//!   re-parse them into an equal tree. Statements, members and `when` entries
//!   go on their own lines, indented by block depth.
//! - **Lossless** ([`WriterConfiguration::extras`]): every node writes its
//!   `before` extras, its own tokens and children, then its `after` extras.
//!   `within` extras are written in front of the own token they preceded in
//!   the source. No separator is added except between two word characters
//!   that would otherwise merge, so writing a tree parsed in lossless mode
//!   reproduces the source byte for byte.
//!
//! ```rust,ignore
//! use kast_core::parser::{KastParser, ParserConfiguration};
//! use kast_core::writer::{Writer, WriterConfiguration};
//!
//! let source = "val x = 1 // one\n";
//! let root = KastParser::new(ParserConfiguration::file().lossless()).parse(source)?;
//! assert_eq!(Writer::new(WriterConfiguration::lossless()).write(&root), source);
//! ```

mod declarations;
mod expressions;
mod types;

use serde::{Deserialize, Serialize};

use crate::ast::{CommaSeparatedNodeList, Extra, Extras, NodeList, NodeRef, Root};

/// Writer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfiguration {
    /// Write node extras instead of synthetic separators
    pub extras: bool,

    /// Number of spaces per block level in default mode
    pub indent_size: usize,
}

impl Default for WriterConfiguration {
    fn default() -> Self {
        Self {
            extras: false,
            indent_size: 4,
        }
    }
}

impl WriterConfiguration {
    pub fn lossless() -> Self {
        Self {
            extras: true,
            ..Self::default()
        }
    }
}

/// Serializes roots or single nodes back to source text
#[derive(Debug, Clone, Default)]
pub struct Writer {
    config: WriterConfiguration,
}

impl Writer {
    pub fn new(config: WriterConfiguration) -> Self {
        Self { config }
    }

    /// Writer for the lossless mode
    pub fn with_extras() -> Self {
        Self::new(WriterConfiguration::lossless())
    }

    pub fn config(&self) -> &WriterConfiguration {
        &self.config
    }

    pub fn write(&self, root: &Root) -> String {
        let mut context = WriteContext::new(&self.config);
        match root {
            Root::File(file) => context.file(file),
            Root::Script(script) => context.script(script),
        }
        context.finish()
    }

    /// Write a single node and everything below it
    pub fn write_node(&self, node: NodeRef<'_>) -> String {
        let mut context = WriteContext::new(&self.config);
        context.node_ref(node);
        context.finish()
    }
}

/// A node being written: its extras and how many own tokens are out
struct Frame<'a> {
    extras: &'a Extras,
    owned: usize,
    /// `within` entries written so far
    within_written: usize,
}

/// Output buffer and position state shared by all node writers
struct WriteContext<'a> {
    lossless: bool,
    indent_size: usize,
    output: String,
    indent_level: usize,
    frames: Vec<Frame<'a>>,
}

impl<'a> WriteContext<'a> {
    fn new(config: &WriterConfiguration) -> Self {
        Self {
            lossless: config.extras,
            indent_size: config.indent_size,
            output: String::new(),
            indent_level: 0,
            frames: Vec::new(),
        }
    }

    fn finish(self) -> String {
        self.output
    }

    // ==================
    // Nodes and tokens
    // ==================

    /// Write a node: `before`, `content`, `after`
    fn node(&mut self, extras: &'a Extras, content: impl FnOnce(&mut Self)) {
        if self.lossless {
            self.extras(&extras.before);
        }
        self.frames.push(Frame {
            extras,
            owned: 0,
            within_written: 0,
        });
        content(self);
        let frame = self.frames.pop();
        if self.lossless {
            // A rebuilt node may point `within` past its last token
            if let Some(frame) = frame {
                self.extras(&frame.extras.within[frame.within_written..]);
            }
            self.extras(&extras.after);
        }
    }

    /// A token owned by the innermost node
    fn token(&mut self, text: &str) {
        self.own_token();
        self.emit(text, true);
    }

    /// A token of string literal content, never separated from its neighbours
    fn literal(&mut self, text: &str) {
        self.own_token();
        self.emit(text, false);
    }

    fn own_token(&mut self) {
        if !self.lossless {
            return;
        }
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        let index = frame.owned;
        frame.owned += 1;
        let extras = frame.extras;
        let start = frame.within_written;
        let run = extras
            .within_at
            .iter()
            .zip(&extras.within)
            .skip(start)
            .take_while(|&(&at, _)| at == index)
            .count();
        frame.within_written += run;
        self.extras(&extras.within[start..start + run]);
    }

    fn emit(&mut self, text: &str, separate: bool) {
        if separate {
            let last = self.output.chars().last();
            let first = text.chars().next();
            if let (Some(last), Some(first)) = (last, first)
                && merges(last, first, self.lossless)
            {
                self.output.push(' ');
            }
        }
        self.output.push_str(text);
    }

    fn extras(&mut self, extras: &[Extra]) {
        for extra in extras {
            self.output.push_str(&extra.text);
        }
    }

    // ==================
    // Default-mode layout
    // ==================

    /// A single space, unless the output already ends in whitespace
    fn space(&mut self) {
        if self.lossless || self.output.is_empty() || self.output.ends_with([' ', '\n']) {
            return;
        }
        self.output.push(' ');
    }

    /// A line break followed by the current indentation
    fn newline(&mut self) {
        if self.lossless {
            return;
        }
        let trimmed = self.output.trim_end_matches(' ').len();
        self.output.truncate(trimmed);
        self.output.push('\n');
        let width = self.indent_level * self.indent_size;
        self.output.extend(std::iter::repeat_n(' ', width));
    }

    /// An empty line, then the current indentation
    fn blank_line(&mut self) {
        if self.lossless {
            return;
        }
        let trimmed = self.output.trim_end_matches([' ', '\n']).len();
        self.output.truncate(trimmed);
        self.output.push('\n');
        self.newline();
    }

    /// Text that the lossless mode finds among the extras instead
    fn synthetic(&mut self, text: &str) {
        if !self.lossless {
            self.emit(text, true);
        }
    }

    fn indented(&mut self, content: impl FnOnce(&mut Self)) {
        self.indent_level += 1;
        content(self);
        self.indent_level -= 1;
    }

    // ==================
    // Containers
    // ==================

    fn comma_list<T>(
        &mut self,
        list: &'a CommaSeparatedNodeList<T>,
        mut item: impl FnMut(&mut Self, &'a T),
    ) {
        self.node(&list.extras, |w| {
            if let Some(prefix) = list.prefix {
                w.token(prefix);
                if prefix == ":" {
                    w.space();
                }
            }
            for (index, element) in list.elements.iter().enumerate() {
                if index > 0 {
                    w.token(",");
                    w.space();
                }
                item(w, element);
            }
            if list.trailing_comma {
                w.token(",");
            }
            if let Some(suffix) = list.suffix {
                w.token(suffix);
            }
        });
    }

    /// Elements of a node list, `separator` written between two of them
    fn node_list<T>(
        &mut self,
        list: &'a NodeList<T>,
        separator: impl Fn(&mut Self),
        mut item: impl FnMut(&mut Self, &'a T),
    ) {
        self.node(&list.extras, |w| {
            if let Some(prefix) = list.prefix {
                w.token(prefix);
            }
            for (index, element) in list.elements.iter().enumerate() {
                if index > 0 {
                    separator(w);
                }
                item(w, element);
            }
            if let Some(suffix) = list.suffix {
                w.token(suffix);
            }
        });
    }

    /// Write any node through its kind-specific writer
    fn node_ref(&mut self, node: NodeRef<'a>) {
        match node {
            NodeRef::File(n) => self.file(n),
            NodeRef::Script(n) => self.script(n),
            NodeRef::PackageDirective(n) => self.package_directive(n),
            NodeRef::ImportDirective(n) => self.import_directive(n),
            NodeRef::ImportAlias(n) => self.import_alias(n),
            NodeRef::ClassDeclaration(n) => self.class(n),
            NodeRef::PrimaryConstructor(n) => self.primary_constructor(n),
            NodeRef::CallConstructorParent(n) => self.call_constructor_parent(n),
            NodeRef::DelegatedTypeParent(n) => self.delegated_type_parent(n),
            NodeRef::TypeParent(n) => self.type_parent(n),
            NodeRef::ClassBody(n) => self.class_body(n),
            NodeRef::EnumEntry(n) => self.enum_entry(n),
            NodeRef::InitDeclaration(n) => self.init(n),
            NodeRef::FunctionDeclaration(n) => self.function(n),
            NodeRef::FunctionParam(n) => self.function_param(n),
            NodeRef::ExpressionBody(n) => self.expression_body(n),
            NodeRef::PropertyDeclaration(n) => self.property(n),
            NodeRef::SingleVariable(n) => self.single_variable(n),
            NodeRef::MultiVariable(n) => self.multi_variable(n),
            NodeRef::PropertyDelegate(n) => self.property_delegate(n),
            NodeRef::Getter(n) => self.getter(n),
            NodeRef::Setter(n) => self.setter(n),
            NodeRef::TypeAliasDeclaration(n) => self.type_alias(n),
            NodeRef::SecondaryConstructor(n) => self.secondary_constructor(n),
            NodeRef::DelegationCall(n) => self.delegation_call(n),
            NodeRef::IfExpression(n) => self.if_expression(n),
            NodeRef::TryExpression(n) => self.try_expression(n),
            NodeRef::CatchClause(n) => self.catch_clause(n),
            NodeRef::ForExpression(n) => self.for_expression(n),
            NodeRef::WhileExpression(n) => self.while_expression(n),
            NodeRef::BinaryExpression(n) => self.binary(n),
            NodeRef::UnaryExpression(n) => self.unary(n),
            NodeRef::TypeOpExpression(n) => self.type_op(n),
            NodeRef::CallableReferenceExpression(n) => self.callable_reference(n),
            NodeRef::ClassLiteralExpression(n) => self.class_literal(n),
            NodeRef::ParenthesizedExpression(n) => self.parenthesized(n),
            NodeRef::StringTemplate(n) => self.string_template(n),
            NodeRef::RegularStringEntry(n) => self.regular_string_entry(n),
            NodeRef::ShortTemplateEntry(n) => self.short_template_entry(n),
            NodeRef::UnicodeEscapeEntry(n) => self.unicode_escape_entry(n),
            NodeRef::RegularEscapeEntry(n) => self.regular_escape_entry(n),
            NodeRef::LongTemplateEntry(n) => self.long_template_entry(n),
            NodeRef::ConstantExpression(n) => self.constant(n),
            NodeRef::LambdaExpression(n) => self.lambda(n),
            NodeRef::LambdaBody(n) => self.lambda_body(n),
            NodeRef::ThisExpression(n) => self.this(n),
            NodeRef::SuperExpression(n) => self.super_expression(n),
            NodeRef::WhenExpression(n) => self.when(n),
            NodeRef::WhenSubject(n) => self.when_subject(n),
            NodeRef::WhenConditionsEntry(n) => self.when_conditions_entry(n),
            NodeRef::WhenElseEntry(n) => self.when_else_entry(n),
            NodeRef::WhenExpressionCondition(n) => self.when_expression_condition(n),
            NodeRef::WhenInCondition(n) => self.when_in_condition(n),
            NodeRef::WhenIsCondition(n) => self.when_is_condition(n),
            NodeRef::ObjectExpression(n) => self.object(n),
            NodeRef::ThrowExpression(n) => self.throw(n),
            NodeRef::ReturnExpression(n) => self.return_expression(n),
            NodeRef::ContinueExpression(n) => self.continue_expression(n),
            NodeRef::BreakExpression(n) => self.break_expression(n),
            NodeRef::CollectionLiteralExpression(n) => self.collection_literal(n),
            NodeRef::Name(n) => self.name(n),
            NodeRef::LabeledExpression(n) => self.labeled(n),
            NodeRef::AnnotatedExpression(n) => self.annotated(n),
            NodeRef::CallExpression(n) => self.call(n),
            NodeRef::LambdaArg(n) => self.lambda_arg(n),
            NodeRef::ArrayAccessExpression(n) => self.array_access(n),
            NodeRef::AnonymousFunctionExpression(n) => self.anonymous_function(n),
            NodeRef::PropertyExpression(n) => self.property_expression(n),
            NodeRef::Block(n) => self.block(n),
            NodeRef::TypeRef(n) => self.type_ref(n),
            NodeRef::FunctionType(n) => self.function_type(n),
            NodeRef::ContextReceiver(n) => self.context_receiver(n),
            NodeRef::FunctionTypeParam(n) => self.function_type_param(n),
            NodeRef::SimpleType(n) => self.simple_type(n),
            NodeRef::SimpleTypePiece(n) => self.simple_type_piece(n),
            NodeRef::NullableType(n) => self.nullable_type(n),
            NodeRef::DynamicType(n) => self.dynamic_type(n),
            NodeRef::StarProjection(n) => self.star_projection(n),
            NodeRef::TypeProjection(n) => self.type_projection(n),
            NodeRef::TypeParam(n) => self.type_param(n),
            NodeRef::ConstructorCallee(n) => self.constructor_callee(n),
            NodeRef::ValueArgument(n) => self.value_argument(n),
            NodeRef::AnnotationSet(n) => self.annotation_set(n),
            NodeRef::Annotation(n) => self.annotation(n),
            NodeRef::TypeConstraintSet(n) => self.type_constraint_set(n),
            NodeRef::TypeConstraint(n) => self.type_constraint(n),
            NodeRef::Contract(n) => self.contract(n),
            NodeRef::ContractEffect(n) => self.contract_effect(n),
            NodeRef::Keyword(n) => self.keyword(n),
        }
    }
}

/// Whether two adjacent characters would lex as one token
///
/// Operator pairs only come up in built trees; parsed trees keep the trivia
/// that separated them.
fn merges(last: char, first: char, lossless: bool) -> bool {
    let word = |c: char| c.is_alphanumeric() || c == '_' || c == '`';
    if word(last) && word(first) {
        return true;
    }
    !lossless
        && ((last == first && matches!(last, '+' | '-' | '!'))
            || (last == '/' && matches!(first, '/' | '*')))
}

#[cfg(test)]
mod tests;
