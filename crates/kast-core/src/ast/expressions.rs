//! Expressions and their supporting nodes

use serde::{Deserialize, Serialize};

use super::{
    AnnotationSet, ClassDeclaration, CommaSeparatedNodeList, FunctionDeclaration, FunctionParam,
    Keyword, NodeList, PropertyDeclaration, Statement, TypeArgument, TypeRef, ValueArgument,
    Variable, family, node,
};

family! {
    pub enum Expression {
        If(IfExpression),
        Try(TryExpression),
        For(ForExpression),
        While(WhileExpression),
        Binary(BinaryExpression),
        Unary(UnaryExpression),
        TypeOp(TypeOpExpression),
        CallableReference(CallableReferenceExpression),
        ClassLiteral(ClassLiteralExpression),
        Parenthesized(ParenthesizedExpression),
        StringTemplate(StringTemplate),
        Constant(ConstantExpression),
        Lambda(LambdaExpression),
        This(ThisExpression),
        Super(SuperExpression),
        When(WhenExpression),
        Object(ObjectExpression),
        Throw(ThrowExpression),
        Return(ReturnExpression),
        Continue(ContinueExpression),
        Break(BreakExpression),
        CollectionLiteral(CollectionLiteralExpression),
        Name(Name),
        Labeled(LabeledExpression),
        Annotated(AnnotatedExpression),
        Call(CallExpression),
        ArrayAccess(ArrayAccessExpression),
        AnonymousFunction(AnonymousFunctionExpression),
        Property(PropertyExpression),
        Block(Block),
    }
}

node! {
    /// An identifier, kept with its backticks if it had any
    pub struct Name {
        pub text: String,
    }
}

impl Name {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extras: Default::default(),
        }
    }
}

node! {
    pub struct IfExpression {
        pub condition: Box<Expression>,
        pub body: Box<Expression>,
        pub else_body: Option<Box<Expression>>,
    }
}

node! {
    pub struct TryExpression {
        pub block: Block,
        pub catches: Vec<CatchClause>,
        pub finally_block: Option<Block>,
    }
}

node! {
    /// `catch (e: Exception) { ... }`
    pub struct CatchClause {
        pub params: CommaSeparatedNodeList<FunctionParam>,
        pub block: Block,
    }
}

node! {
    pub struct ForExpression {
        pub variable: Variable,
        pub iterable: Box<Expression>,
        pub body: Box<Expression>,
    }
}

node! {
    /// `while (c) body` or, with `do_while`, `do body while (c)`
    pub struct WhileExpression {
        pub condition: Box<Expression>,
        pub body: Option<Box<Expression>>,
        pub do_while: bool,
    }
}

node! {
    /// Infix operators, infix calls and `.`/`?.` member access
    pub struct BinaryExpression {
        pub lhs: Box<Expression>,
        pub operator: BinaryOperator,
        pub rhs: Box<Expression>,
    }
}

family! {
    pub enum BinaryOperator {
        /// `a shl b`
        Infix(Name),
        Token(Keyword),
    }
}

node! {
    pub struct UnaryExpression {
        pub operator: Keyword,
        pub expression: Box<Expression>,
        pub prefix: bool,
    }
}

node! {
    /// `x as T`, `x as? T`, `x is T`, `x !is T`
    pub struct TypeOpExpression {
        pub lhs: Box<Expression>,
        pub operator: Keyword,
        pub rhs: TypeRef,
    }
}

family! {
    /// Left-hand side of `::`
    pub enum DoubleColonReceiver {
        Expression(Expression),
        Type(TypeRef),
    }
}

node! {
    /// `::foo`, `a::foo`, `List<Int>::size`
    pub struct CallableReferenceExpression {
        pub receiver: Option<Box<DoubleColonReceiver>>,
        pub name: Name,
    }
}

node! {
    /// `Foo::class`
    pub struct ClassLiteralExpression {
        pub receiver: Box<DoubleColonReceiver>,
    }
}

node! {
    pub struct ParenthesizedExpression {
        pub expression: Box<Expression>,
    }
}

node! {
    /// `"..."` or, with `raw`, `"""..."""`
    pub struct StringTemplate {
        pub entries: Vec<StringEntry>,
        pub raw: bool,
    }
}

family! {
    pub enum StringEntry {
        Regular(RegularStringEntry),
        ShortTemplate(ShortTemplateEntry),
        UnicodeEscape(UnicodeEscapeEntry),
        RegularEscape(RegularEscapeEntry),
        LongTemplate(LongTemplateEntry),
    }
}

node! {
    pub struct RegularStringEntry {
        pub text: String,
    }
}

node! {
    /// `$name`; `text` has no dollar sign
    pub struct ShortTemplateEntry {
        pub text: String,
    }
}

node! {
    /// `\uXXXX`; `digits` holds the four hex digits
    pub struct UnicodeEscapeEntry {
        pub digits: String,
    }
}

node! {
    /// `\n`, `\$` and friends; `character` is the text after the backslash
    pub struct RegularEscapeEntry {
        pub character: String,
    }
}

node! {
    /// `${expression}`
    pub struct LongTemplateEntry {
        pub expression: Box<Expression>,
    }
}

/// Literal kinds, kept apart so the text need not be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstantKind {
    Boolean,
    Char,
    Int,
    Float,
    Null,
}

node! {
    /// A literal with its exact source text
    pub struct ConstantExpression {
        pub kind: ConstantKind,
        pub text: String,
    }
}

node! {
    /// `{ a, (b, c) -> body }`
    pub struct LambdaExpression {
        /// `Some` whenever the source had an arrow, even with no parameters
        pub params: Option<CommaSeparatedNodeList<Variable>>,
        pub body: LambdaBody,
    }
}

node! {
    pub struct LambdaBody {
        pub statements: Vec<Statement>,
    }
}

node! {
    /// `this` or `this@label`
    pub struct ThisExpression {
        pub label: Option<Name>,
    }
}

node! {
    /// `super`, `super<T>`, `super@label`
    pub struct SuperExpression {
        pub type_arg: Option<TypeRef>,
        pub label: Option<Name>,
    }
}

node! {
    pub struct WhenExpression {
        pub subject: Option<WhenSubject>,
        /// Entries between `{` and `}`
        pub entries: NodeList<WhenEntry>,
    }
}

node! {
    /// `(x)` or `(val y = x)` after `when`
    pub struct WhenSubject {
        pub expression: Box<Expression>,
    }
}

family! {
    pub enum WhenEntry {
        Conditions(WhenConditionsEntry),
        Else(WhenElseEntry),
    }
}

node! {
    pub struct WhenConditionsEntry {
        pub conditions: CommaSeparatedNodeList<WhenCondition>,
        pub body: Box<Expression>,
    }
}

node! {
    pub struct WhenElseEntry {
        pub body: Box<Expression>,
    }
}

family! {
    pub enum WhenCondition {
        Expression(WhenExpressionCondition),
        In(WhenInCondition),
        Is(WhenIsCondition),
    }
}

node! {
    pub struct WhenExpressionCondition {
        pub expression: Box<Expression>,
    }
}

node! {
    /// `in range` or `!in range`
    pub struct WhenInCondition {
        pub operator: Keyword,
        pub expression: Box<Expression>,
    }
}

node! {
    /// `is T` or `!is T`
    pub struct WhenIsCondition {
        pub operator: Keyword,
        pub type_ref: TypeRef,
    }
}

node! {
    /// `object : Base { ... }` used as a value
    pub struct ObjectExpression {
        pub declaration: Box<ClassDeclaration>,
    }
}

node! {
    pub struct ThrowExpression {
        pub expression: Box<Expression>,
    }
}

node! {
    pub struct ReturnExpression {
        pub label: Option<Name>,
        pub expression: Option<Box<Expression>>,
    }
}

node! {
    pub struct ContinueExpression {
        pub label: Option<Name>,
    }
}

node! {
    pub struct BreakExpression {
        pub label: Option<Name>,
    }
}

node! {
    /// `[a, b]`, legal in annotation arguments
    pub struct CollectionLiteralExpression {
        pub expressions: CommaSeparatedNodeList<Expression>,
    }
}

node! {
    /// `label@ expression`
    pub struct LabeledExpression {
        pub label: Name,
        pub expression: Box<Expression>,
    }
}

node! {
    pub struct AnnotatedExpression {
        pub annotation_sets: Vec<AnnotationSet>,
        pub expression: Box<Expression>,
    }
}

node! {
    /// `f<T>(args) { lambda }`
    pub struct CallExpression {
        pub expression: Box<Expression>,
        pub type_args: Option<CommaSeparatedNodeList<TypeArgument>>,
        pub args: Option<CommaSeparatedNodeList<ValueArgument>>,
        pub lambda_arg: Option<LambdaArg>,
    }
}

node! {
    /// The trailing lambda of a call, with its label and annotations
    pub struct LambdaArg {
        pub annotation_sets: Vec<AnnotationSet>,
        pub label: Option<Name>,
        pub lambda: LambdaExpression,
    }
}

node! {
    /// `a[i, j]`
    pub struct ArrayAccessExpression {
        pub expression: Box<Expression>,
        pub indices: CommaSeparatedNodeList<Expression>,
    }
}

node! {
    pub struct AnonymousFunctionExpression {
        pub function: Box<FunctionDeclaration>,
    }
}

node! {
    /// A property declaration in expression position (`when (val x = y)`)
    pub struct PropertyExpression {
        pub declaration: Box<PropertyDeclaration>,
    }
}

node! {
    pub struct Block {
        pub statements: Vec<Statement>,
    }
}
