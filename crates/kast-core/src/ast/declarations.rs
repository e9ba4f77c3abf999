//! Roots and declarations

use super::{
    AnnotationSet, Block, CommaSeparatedNodeList, ConstructorCallee, Expression, Keyword, Modifier,
    Name, PostModifier, TypeConstraintSet, TypeParam, TypeRef, ValueArgument, family, node,
};

family! {
    /// Root of a parsed unit
    pub enum Root {
        File(File),
        Script(Script),
    }
}

node! {
    /// A `.kt` file
    pub struct File {
        /// `@file:` annotations
        pub annotation_sets: Vec<AnnotationSet>,
        pub package_directive: Option<PackageDirective>,
        pub import_directives: Vec<ImportDirective>,
        pub declarations: Vec<Declaration>,
    }
}

node! {
    /// A `.kts` script: top-level statements instead of declarations
    pub struct Script {
        pub annotation_sets: Vec<AnnotationSet>,
        pub package_directive: Option<PackageDirective>,
        pub import_directives: Vec<ImportDirective>,
        pub statements: Vec<Statement>,
    }
}

node! {
    /// `package a.b.c`
    pub struct PackageDirective {
        pub names: Vec<Name>,
    }
}

node! {
    /// `import a.b.C`, `import a.b.*` or `import a.b.C as D`
    pub struct ImportDirective {
        pub names: Vec<Name>,
        pub wildcard: bool,
        pub alias: Option<ImportAlias>,
    }
}

node! {
    pub struct ImportAlias {
        pub name: Name,
    }
}

family! {
    pub enum Declaration {
        Class(ClassDeclaration),
        Function(FunctionDeclaration),
        Property(PropertyDeclaration),
        TypeAlias(TypeAliasDeclaration),
        SecondaryConstructor(SecondaryConstructor),
        Init(InitDeclaration),
    }
}

family! {
    /// Anything that may appear in a block
    pub enum Statement {
        Declaration(Declaration),
        Expression(Expression),
    }
}

node! {
    /// Classes, interfaces and objects
    ///
    /// The declaration keyword tells them apart; companion objects carry a
    /// `companion` modifier and object literals wrap a nameless one.
    pub struct ClassDeclaration {
        pub modifiers: Vec<Modifier>,
        pub declaration_keyword: Keyword,
        pub name: Option<Name>,
        pub type_params: Option<CommaSeparatedNodeList<TypeParam>>,
        pub primary_constructor: Option<PrimaryConstructor>,
        /// Supertypes, prefixed by `:`
        pub parents: Option<CommaSeparatedNodeList<ClassParent>>,
        pub type_constraint_set: Option<TypeConstraintSet>,
        pub body: Option<ClassBody>,
    }
}

node! {
    /// `(val x: Int)` or `private constructor(val x: Int)`
    pub struct PrimaryConstructor {
        pub modifiers: Vec<Modifier>,
        pub constructor_keyword: bool,
        pub params: CommaSeparatedNodeList<FunctionParam>,
    }
}

family! {
    pub enum ClassParent {
        CallConstructor(CallConstructorParent),
        DelegatedType(DelegatedTypeParent),
        Type(TypeParent),
    }
}

node! {
    /// `Base(args)`
    pub struct CallConstructorParent {
        pub callee: ConstructorCallee,
        pub args: CommaSeparatedNodeList<ValueArgument>,
    }
}

node! {
    /// `Api by impl`
    pub struct DelegatedTypeParent {
        pub type_ref: TypeRef,
        pub expression: Box<Expression>,
    }
}

node! {
    pub struct TypeParent {
        pub type_ref: TypeRef,
    }
}

node! {
    /// `{ ... }` of a class, with enum entries ahead of the members
    pub struct ClassBody {
        pub enum_entries: Option<CommaSeparatedNodeList<EnumEntry>>,
        pub declarations: Vec<Declaration>,
    }
}

node! {
    pub struct EnumEntry {
        pub modifiers: Vec<Modifier>,
        pub name: Name,
        pub args: Option<CommaSeparatedNodeList<ValueArgument>>,
        pub body: Option<ClassBody>,
    }
}

node! {
    /// `init { ... }`
    pub struct InitDeclaration {
        pub block: Block,
    }
}

node! {
    /// Named functions; anonymous functions reuse it without a name
    pub struct FunctionDeclaration {
        pub modifiers: Vec<Modifier>,
        pub type_params: Option<CommaSeparatedNodeList<TypeParam>>,
        pub receiver_type: Option<TypeRef>,
        pub name: Option<Name>,
        pub params: CommaSeparatedNodeList<FunctionParam>,
        pub return_type: Option<TypeRef>,
        pub post_modifiers: Vec<PostModifier>,
        pub body: Option<FunctionBody>,
    }
}

node! {
    /// A parameter of a function, constructor, accessor or catch clause
    pub struct FunctionParam {
        pub modifiers: Vec<Modifier>,
        /// `val`/`var` on primary constructor parameters
        pub val_or_var: Option<Keyword>,
        pub name: Name,
        pub type_ref: Option<TypeRef>,
        pub default_value: Option<Box<Expression>>,
    }
}

family! {
    pub enum FunctionBody {
        Block(Block),
        Expression(ExpressionBody),
    }
}

node! {
    /// `= expression`
    pub struct ExpressionBody {
        pub expression: Box<Expression>,
    }
}

node! {
    pub struct PropertyDeclaration {
        pub modifiers: Vec<Modifier>,
        pub val_or_var: Keyword,
        pub type_params: Option<CommaSeparatedNodeList<TypeParam>>,
        pub receiver_type: Option<TypeRef>,
        pub variable: Variable,
        pub type_constraint_set: Option<TypeConstraintSet>,
        pub initializer: Option<Box<Expression>>,
        pub delegate: Option<PropertyDelegate>,
        pub accessors: Vec<Accessor>,
    }
}

family! {
    /// What a property, loop or lambda parameter binds
    pub enum Variable {
        Single(SingleVariable),
        Multi(MultiVariable),
    }
}

node! {
    /// `x` or `x: Int`
    pub struct SingleVariable {
        pub name: Name,
        pub type_ref: Option<TypeRef>,
    }
}

node! {
    /// `(a, b: Int)` with an optional type for the whole
    pub struct MultiVariable {
        pub variables: CommaSeparatedNodeList<SingleVariable>,
        pub type_ref: Option<TypeRef>,
    }
}

node! {
    /// `by lazy { ... }`
    pub struct PropertyDelegate {
        pub expression: Box<Expression>,
    }
}

family! {
    pub enum Accessor {
        Getter(Getter),
        Setter(Setter),
    }
}

node! {
    pub struct Getter {
        pub modifiers: Vec<Modifier>,
        /// Always empty; present when the source wrote `get()`
        pub params: Option<CommaSeparatedNodeList<FunctionParam>>,
        pub type_ref: Option<TypeRef>,
        pub body: Option<FunctionBody>,
    }
}

node! {
    pub struct Setter {
        pub modifiers: Vec<Modifier>,
        pub params: Option<CommaSeparatedNodeList<FunctionParam>>,
        pub type_ref: Option<TypeRef>,
        pub body: Option<FunctionBody>,
    }
}

node! {
    pub struct TypeAliasDeclaration {
        pub modifiers: Vec<Modifier>,
        pub name: Name,
        pub type_params: Option<CommaSeparatedNodeList<TypeParam>>,
        pub type_ref: TypeRef,
    }
}

node! {
    pub struct SecondaryConstructor {
        pub modifiers: Vec<Modifier>,
        pub params: CommaSeparatedNodeList<FunctionParam>,
        pub delegation_call: Option<DelegationCall>,
        pub block: Option<Block>,
    }
}

node! {
    /// `: this(...)` or `: super(...)`
    pub struct DelegationCall {
        pub target: Keyword,
        pub args: CommaSeparatedNodeList<ValueArgument>,
    }
}
