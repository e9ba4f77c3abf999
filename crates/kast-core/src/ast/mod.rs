//! Typed syntax tree for Kotlin source
//!
//! The tree is a closed set of node structs grouped into families (`enum`s
//! such as [`Expression`] or [`Declaration`]). Every node owns its children
//! (`Box`, `Vec`, `Option`), carries no parent pointer and embeds an
//! [`Extras`] record holding the trivia that surrounded it in the source.
//!
//! ## Uniform access
//!
//! - [`NodeRef`] is a borrowed view over any node; [`NodeRef::children`]
//!   lists the child nodes of a node in declared field order, which is also
//!   the order in which the writer emits them.
//! - [`Node`] is the owned counterpart, used to hand replacements to the
//!   mutable visitor.
//!
//! Containers ([`NodeList`], [`CommaSeparatedNodeList`]) are transparent:
//! their elements appear as direct children of the owning node.
//!
//! ## Equality
//!
//! `PartialEq` is structural. Extras are ignored, so a tree parsed in
//! lossless mode equals the same tree parsed without trivia.

use std::any::type_name;

mod declarations;
mod expressions;
mod extras;
mod keyword;
mod list;
mod types;

pub use declarations::*;
pub use expressions::*;
pub use extras::{Extra, ExtraKind, Extras, HasExtras};
pub use keyword::{KeywordKind, UnknownKeyword};
pub use list::{CommaSeparatedNodeList, NodeList};
pub use types::*;

/// Callback replacing a child node, or `None` to keep it
pub type Rewriter<'r> = dyn FnMut(NodeRef<'_>) -> Option<Node> + 'r;

/// A field of a node that may hold child nodes
pub trait Slot: Clone {
    /// Push the child nodes held by this field, in order
    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>);

    /// Offer every child node to `rewriter`; `Some` if anything changed
    fn rewrite(&self, rewriter: &mut Rewriter<'_>) -> Option<Self>;
}

/// Child enumeration of a node struct
pub trait ChildNodes {
    fn collect_children<'a>(&'a self, out: &mut Vec<NodeRef<'a>>);
}

/// Copy-on-write rebuild of a node struct
pub trait RewriteChildren: Sized {
    fn rewrite_children(&self, rewriter: &mut Rewriter<'_>) -> Option<Self>;
}

/// Conversion from an owned [`Node`] into a node struct or family
pub trait FromNode: Sized {
    /// Hand the node back when it does not belong to this type
    fn try_from_node(node: Node) -> Result<Self, Node>;

    /// Panics when the node does not belong to this type
    fn from_node(node: Node) -> Self {
        match Self::try_from_node(node) {
            Ok(value) => value,
            Err(node) => panic!(
                "a {} node cannot stand in for {}",
                node.kind_name(),
                type_name::<Self>()
            ),
        }
    }
}

/// Borrowed view of a node struct or family
pub trait AsNodeRef {
    fn as_node_ref(&self) -> NodeRef<'_>;
}

/// Declares a node struct with an `extras` field and its traversal impls
macro_rules! node {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
            pub extras: $crate::ast::Extras,
        }

        impl $crate::ast::HasExtras for $name {
            fn extras(&self) -> &$crate::ast::Extras {
                &self.extras
            }

            fn extras_mut(&mut self) -> &mut $crate::ast::Extras {
                &mut self.extras
            }
        }

        impl $crate::ast::ChildNodes for $name {
            #[allow(unused_variables)]
            fn collect_children<'a>(&'a self, out: &mut Vec<$crate::ast::NodeRef<'a>>) {
                $( $crate::ast::Slot::collect(&self.$field, out); )*
            }
        }

        impl $crate::ast::RewriteChildren for $name {
            #[allow(unused_mut, unused_variables)]
            fn rewrite_children(&self, rewriter: &mut $crate::ast::Rewriter<'_>) -> Option<Self> {
                let mut changed = false;
                $(
                    let $field = $crate::ast::Slot::rewrite(&self.$field, rewriter);
                    changed |= $field.is_some();
                )*
                if !changed {
                    return None;
                }
                Some(Self {
                    $( $field: $field.unwrap_or_else(|| self.$field.clone()), )*
                    extras: self.extras.clone(),
                })
            }
        }
    };
}

/// Declares a node family: an enum over node structs or other families
macro_rules! family {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($ty:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant($ty),
            )+
        }

        impl $crate::ast::FromNode for $name {
            fn try_from_node(node: $crate::ast::Node) -> Result<Self, $crate::ast::Node> {
                $(
                    let node = match <$ty as $crate::ast::FromNode>::try_from_node(node) {
                        Ok(value) => return Ok(Self::$variant(value)),
                        Err(node) => node,
                    };
                )+
                Err(node)
            }
        }

        impl $crate::ast::AsNodeRef for $name {
            fn as_node_ref(&self) -> $crate::ast::NodeRef<'_> {
                match self {
                    $( Self::$variant(inner) => $crate::ast::AsNodeRef::as_node_ref(inner), )+
                }
            }
        }

        impl $crate::ast::HasExtras for $name {
            fn extras(&self) -> &$crate::ast::Extras {
                match self {
                    $( Self::$variant(inner) => $crate::ast::HasExtras::extras(inner), )+
                }
            }

            fn extras_mut(&mut self) -> &mut $crate::ast::Extras {
                match self {
                    $( Self::$variant(inner) => $crate::ast::HasExtras::extras_mut(inner), )+
                }
            }
        }

        impl $crate::ast::Slot for $name {
            fn collect<'a>(&'a self, out: &mut Vec<$crate::ast::NodeRef<'a>>) {
                out.push($crate::ast::AsNodeRef::as_node_ref(self));
            }

            fn rewrite(&self, rewriter: &mut $crate::ast::Rewriter<'_>) -> Option<Self> {
                rewriter($crate::ast::AsNodeRef::as_node_ref(self))
                    .map(<Self as $crate::ast::FromNode>::from_node)
            }
        }

        $(
            impl From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

/// Generates [`Node`], [`NodeRef`] and the per-struct conversions
macro_rules! nodes {
    ($($variant:ident),+ $(,)?) => {
        /// An owned node of any kind
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Node {
            $( $variant($variant), )+
        }

        /// A borrowed node of any kind
        #[derive(Debug, Clone, Copy)]
        pub enum NodeRef<'a> {
            $( $variant(&'a $variant), )+
        }

        impl AsNodeRef for Node {
            fn as_node_ref(&self) -> NodeRef<'_> {
                match self {
                    $( Node::$variant(node) => NodeRef::$variant(node), )+
                }
            }
        }

        impl Node {
            pub fn kind_name(&self) -> &'static str {
                self.as_node_ref().kind_name()
            }
        }

        impl<'a> NodeRef<'a> {
            /// Name of the node struct, e.g. `"IfExpression"`
            pub fn kind_name(self) -> &'static str {
                match self {
                    $( NodeRef::$variant(_) => stringify!($variant), )+
                }
            }

            pub fn extras(self) -> &'a Extras {
                match self {
                    $( NodeRef::$variant(node) => &node.extras, )+
                }
            }

            /// Child nodes in declared field order
            pub fn children(self) -> Vec<NodeRef<'a>> {
                let mut out = Vec::new();
                match self {
                    $( NodeRef::$variant(node) => node.collect_children(&mut out), )+
                }
                out
            }

            /// Rebuild this node with some children replaced
            pub fn rewrite_children(self, rewriter: &mut Rewriter<'_>) -> Option<Node> {
                match self {
                    $( NodeRef::$variant(node) => node.rewrite_children(rewriter).map(Node::$variant), )+
                }
            }

            pub fn to_node(self) -> Node {
                match self {
                    $( NodeRef::$variant(node) => Node::$variant(node.clone()), )+
                }
            }

            /// Address of the referenced node, for identity checks
            pub fn as_ptr(self) -> *const () {
                match self {
                    $( NodeRef::$variant(node) => std::ptr::from_ref(node).cast(), )+
                }
            }
        }

        $(
            impl FromNode for $variant {
                fn try_from_node(node: Node) -> Result<Self, Node> {
                    match node {
                        Node::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }

            impl AsNodeRef for $variant {
                fn as_node_ref(&self) -> NodeRef<'_> {
                    NodeRef::$variant(self)
                }
            }

            impl Slot for $variant {
                fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
                    out.push(NodeRef::$variant(self));
                }

                fn rewrite(&self, rewriter: &mut Rewriter<'_>) -> Option<Self> {
                    rewriter(NodeRef::$variant(self)).map(<$variant>::from_node)
                }
            }

            impl From<$variant> for Node {
                fn from(value: $variant) -> Self {
                    Node::$variant(value)
                }
            }

            impl<'a> From<&'a $variant> for NodeRef<'a> {
                fn from(value: &'a $variant) -> Self {
                    NodeRef::$variant(value)
                }
            }
        )+
    };
}

pub(crate) use {family, node};

nodes! {
    // Roots and preamble
    File,
    Script,
    PackageDirective,
    ImportDirective,
    ImportAlias,
    // Declarations
    ClassDeclaration,
    PrimaryConstructor,
    CallConstructorParent,
    DelegatedTypeParent,
    TypeParent,
    ClassBody,
    EnumEntry,
    InitDeclaration,
    FunctionDeclaration,
    FunctionParam,
    ExpressionBody,
    PropertyDeclaration,
    SingleVariable,
    MultiVariable,
    PropertyDelegate,
    Getter,
    Setter,
    TypeAliasDeclaration,
    SecondaryConstructor,
    DelegationCall,
    // Expressions
    IfExpression,
    TryExpression,
    CatchClause,
    ForExpression,
    WhileExpression,
    BinaryExpression,
    UnaryExpression,
    TypeOpExpression,
    CallableReferenceExpression,
    ClassLiteralExpression,
    ParenthesizedExpression,
    StringTemplate,
    RegularStringEntry,
    ShortTemplateEntry,
    UnicodeEscapeEntry,
    RegularEscapeEntry,
    LongTemplateEntry,
    ConstantExpression,
    LambdaExpression,
    LambdaBody,
    ThisExpression,
    SuperExpression,
    WhenExpression,
    WhenSubject,
    WhenConditionsEntry,
    WhenElseEntry,
    WhenExpressionCondition,
    WhenInCondition,
    WhenIsCondition,
    ObjectExpression,
    ThrowExpression,
    ReturnExpression,
    ContinueExpression,
    BreakExpression,
    CollectionLiteralExpression,
    Name,
    LabeledExpression,
    AnnotatedExpression,
    CallExpression,
    LambdaArg,
    ArrayAccessExpression,
    AnonymousFunctionExpression,
    PropertyExpression,
    Block,
    // Types and supporting nodes
    TypeRef,
    FunctionType,
    ContextReceiver,
    FunctionTypeParam,
    SimpleType,
    SimpleTypePiece,
    NullableType,
    DynamicType,
    StarProjection,
    TypeProjection,
    TypeParam,
    ConstructorCallee,
    ValueArgument,
    AnnotationSet,
    Annotation,
    TypeConstraintSet,
    TypeConstraint,
    Contract,
    ContractEffect,
    Keyword,
}

// ==================
// Generic slots
// ==================

impl<T: Slot> Slot for Option<T> {
    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        if let Some(value) = self {
            value.collect(out);
        }
    }

    fn rewrite(&self, rewriter: &mut Rewriter<'_>) -> Option<Self> {
        self.as_ref()
            .and_then(|value| value.rewrite(rewriter))
            .map(Some)
    }
}

impl<T: Slot> Slot for Box<T> {
    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        (**self).collect(out);
    }

    fn rewrite(&self, rewriter: &mut Rewriter<'_>) -> Option<Self> {
        (**self).rewrite(rewriter).map(Box::new)
    }
}

impl<T: Slot> Slot for Vec<T> {
    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        for element in self {
            element.collect(out);
        }
    }

    fn rewrite(&self, rewriter: &mut Rewriter<'_>) -> Option<Self> {
        let rewritten: Vec<Option<T>> = self
            .iter()
            .map(|element| element.rewrite(rewriter))
            .collect();
        if rewritten.iter().all(Option::is_none) {
            return None;
        }
        Some(
            rewritten
                .into_iter()
                .zip(self)
                .map(|(new, old)| new.unwrap_or_else(|| old.clone()))
                .collect(),
        )
    }
}

impl<T: Slot> Slot for NodeList<T> {
    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        self.elements.collect(out);
    }

    fn rewrite(&self, rewriter: &mut Rewriter<'_>) -> Option<Self> {
        let elements = self.elements.rewrite(rewriter)?;
        Some(Self {
            elements,
            prefix: self.prefix,
            suffix: self.suffix,
            extras: self.extras.clone(),
        })
    }
}

impl<T: Slot> Slot for CommaSeparatedNodeList<T> {
    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        self.elements.collect(out);
    }

    fn rewrite(&self, rewriter: &mut Rewriter<'_>) -> Option<Self> {
        let elements = self.elements.rewrite(rewriter)?;
        Some(Self {
            elements,
            trailing_comma: self.trailing_comma,
            prefix: self.prefix,
            suffix: self.suffix,
            extras: self.extras.clone(),
        })
    }
}

/// Plain data fields hold no nodes
macro_rules! data_slot {
    ($($ty:ty),+) => {
        $(
            impl Slot for $ty {
                fn collect<'a>(&'a self, _out: &mut Vec<NodeRef<'a>>) {}

                fn rewrite(&self, _rewriter: &mut Rewriter<'_>) -> Option<Self> {
                    None
                }
            }
        )+
    };
}

data_slot!(bool, String, KeywordKind, ConstantKind);

impl<T: FromNode> FromNode for Box<T> {
    fn try_from_node(node: Node) -> Result<Self, Node> {
        T::try_from_node(node).map(Box::new)
    }
}

impl<T: AsNodeRef> AsNodeRef for Box<T> {
    fn as_node_ref(&self) -> NodeRef<'_> {
        (**self).as_node_ref()
    }
}

impl<T: HasExtras> HasExtras for Box<T> {
    fn extras(&self) -> &Extras {
        (**self).extras()
    }

    fn extras_mut(&mut self) -> &mut Extras {
        (**self).extras_mut()
    }
}

#[cfg(test)]
mod tests;
