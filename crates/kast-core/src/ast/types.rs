//! Types, modifiers, annotations and other supporting nodes

use super::{CommaSeparatedNodeList, Expression, KeywordKind, Name, NodeList, family, node};

node! {
    /// A type in source, with its modifiers and parentheses
    ///
    /// `@A (@B Int)` nests: the outer reference carries `@A` and owns the
    /// parentheses, the inner one carries `@B`.
    pub struct TypeRef {
        pub modifiers: Vec<Modifier>,
        pub target: TypeRefTarget,
    }
}

family! {
    pub enum TypeRefTarget {
        Type(Type),
        /// `( inner )`
        Parenthesized(Box<TypeRef>),
    }
}

family! {
    pub enum Type {
        Function(FunctionType),
        Simple(SimpleType),
        Nullable(NullableType),
        Dynamic(DynamicType),
    }
}

node! {
    /// `context(A) R.(P) -> T`
    pub struct FunctionType {
        pub context_receiver: Option<ContextReceiver>,
        pub receiver: Option<Box<TypeRef>>,
        pub params: CommaSeparatedNodeList<FunctionTypeParam>,
        pub return_type: Box<TypeRef>,
    }
}

node! {
    pub struct ContextReceiver {
        pub receivers: CommaSeparatedNodeList<TypeRef>,
    }
}

node! {
    /// `(name: T)` or `(T)` inside a function type
    pub struct FunctionTypeParam {
        pub name: Option<Name>,
        pub type_ref: TypeRef,
    }
}

node! {
    /// `a.b.C<T>.D`, outermost piece first
    pub struct SimpleType {
        pub pieces: Vec<SimpleTypePiece>,
    }
}

node! {
    pub struct SimpleTypePiece {
        pub name: Name,
        pub type_args: Option<CommaSeparatedNodeList<TypeArgument>>,
    }
}

node! {
    /// `T?`
    pub struct NullableType {
        pub inner: Box<TypeRef>,
    }
}

node! {
    pub struct DynamicType {}
}

family! {
    pub enum TypeArgument {
        Asterisk(StarProjection),
        Type(TypeProjection),
    }
}

node! {
    /// `*`
    pub struct StarProjection {}
}

node! {
    /// `out T`, `in T`, `T`
    pub struct TypeProjection {
        pub modifiers: Vec<Modifier>,
        pub type_ref: TypeRef,
    }
}

node! {
    /// `reified T : Bound`
    pub struct TypeParam {
        pub modifiers: Vec<Modifier>,
        pub name: Name,
        pub type_ref: Option<TypeRef>,
    }
}

node! {
    pub struct ConstructorCallee {
        pub type_ref: TypeRef,
    }
}

node! {
    /// `expr`, `name = expr`, `*expr`
    pub struct ValueArgument {
        pub name: Option<Name>,
        pub spread: bool,
        pub expression: Box<Expression>,
    }
}

family! {
    pub enum Modifier {
        AnnotationSet(AnnotationSet),
        Keyword(Keyword),
    }
}

node! {
    /// `@Foo`, `@get:Foo(1)`, `@[Foo Bar]`
    pub struct AnnotationSet {
        /// Use-site target such as `get` or `file`
        pub target: Option<Keyword>,
        pub annotations: NodeList<Annotation>,
    }
}

node! {
    pub struct Annotation {
        pub constructor_callee: ConstructorCallee,
        pub args: Option<CommaSeparatedNodeList<ValueArgument>>,
    }
}

family! {
    /// Clauses after a function signature
    pub enum PostModifier {
        TypeConstraintSet(TypeConstraintSet),
        Contract(Contract),
    }
}

node! {
    /// `where T : A, U : B`
    pub struct TypeConstraintSet {
        pub constraints: CommaSeparatedNodeList<TypeConstraint>,
    }
}

node! {
    pub struct TypeConstraint {
        pub annotation_sets: Vec<AnnotationSet>,
        pub name: Name,
        pub type_ref: TypeRef,
    }
}

node! {
    /// `contract [returns() implies (x != null)]`
    pub struct Contract {
        pub effects: CommaSeparatedNodeList<ContractEffect>,
    }
}

node! {
    pub struct ContractEffect {
        pub expression: Box<Expression>,
    }
}

node! {
    /// A reserved word, modifier or operator token
    pub struct Keyword {
        pub kind: KeywordKind,
    }
}

impl Keyword {
    pub fn new(kind: KeywordKind) -> Self {
        Self {
            kind,
            extras: Default::default(),
        }
    }

    pub fn text(&self) -> &'static str {
        self.kind.as_str()
    }
}
