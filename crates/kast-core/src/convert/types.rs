//! Types, type parameters, constraints and annotations

use super::{Converter, Elements};
use crate::ast::{
    Annotation, AnnotationSet, CommaSeparatedNodeList, ConstructorCallee, ContextReceiver,
    Contract, ContractEffect, DynamicType, FunctionType, FunctionTypeParam, NullableType,
    SimpleType, SimpleTypePiece, StarProjection, Type, TypeArgument, TypeConstraint,
    TypeConstraintSet, TypeParam, TypeProjection, TypeRef, TypeRefTarget,
};
use crate::cst::{KtSyntaxKind, KtSyntaxNode};
use crate::error::KastError;
use crate::result::Result;

use KtSyntaxKind as K;

impl Converter<'_> {
    // ==================
    // Type references
    // ==================

    pub(super) fn type_ref(&mut self, node: &KtSyntaxNode) -> Result<TypeRef> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let element = elements.expect_any_node()?;
        let target = self.type_ref_target(&element)?;
        elements.finish()?;

        let extras = self.close();
        let type_ref = TypeRef {
            modifiers,
            target,
            extras,
        };
        Ok(self.created(type_ref, node.clone()))
    }

    /// The part of a type reference after its modifiers
    ///
    /// Parentheses are owned by the enclosing reference.
    fn type_ref_target(&mut self, element: &KtSyntaxNode) -> Result<TypeRefTarget> {
        if element.kind() != K::ParenthesizedType {
            return Ok(TypeRefTarget::Type(self.type_element(element)?));
        }
        let mut elements = Elements::new(element);
        let open = elements.expect_token(K::LParen)?;
        self.own(&open)?;
        let inner = elements.expect_node(K::TypeReference)?;
        let inner = self.type_ref(&inner)?;
        let close = elements.expect_token(K::RParen)?;
        self.own(&close)?;
        elements.finish()?;
        Ok(TypeRefTarget::Parenthesized(Box::new(inner)))
    }

    fn type_element(&mut self, node: &KtSyntaxNode) -> Result<Type> {
        let converted = match node.kind() {
            K::UserType => Type::Simple(self.simple_type(node)?),
            K::NullableType => Type::Nullable(self.nullable_type(node)?),
            K::FunctionType => Type::Function(self.function_type(node)?),
            K::DynamicType => {
                self.open();
                let mut elements = Elements::new(node);
                let keyword = elements.expect_token(K::SoftKw)?;
                self.own(&keyword)?;
                elements.finish()?;
                let extras = self.close();
                Type::Dynamic(self.created(DynamicType { extras }, node.clone()))
            }
            kind => {
                return Err(KastError::unsupported(format!(
                    "unsupported syntax: {kind} is not a type"
                )));
            }
        };
        Ok(converted)
    }

    /// `a.b.C<T>`; the CST nests qualifiers innermost first
    fn simple_type(&mut self, node: &KtSyntaxNode) -> Result<SimpleType> {
        self.open();
        let mut pieces = Vec::new();
        self.simple_type_pieces(node, &mut pieces)?;
        let extras = self.close();
        Ok(self.created(SimpleType { pieces, extras }, node.clone()))
    }

    fn simple_type_pieces(
        &mut self,
        node: &KtSyntaxNode,
        pieces: &mut Vec<SimpleTypePiece>,
    ) -> Result<()> {
        let mut elements = Elements::new(node);
        if let Some(qualifier) = elements.node(K::UserType) {
            self.simple_type_pieces(&qualifier, pieces)?;
            let dot = elements.expect_token(K::Dot)?;
            self.own(&dot)?;
        }

        self.open();
        let reference = elements.expect_node(K::ReferenceExpression)?;
        let mut inner = Elements::new(&reference);
        let ident = inner.expect_token(K::Ident)?;
        inner.finish()?;
        let name = self.name(&ident)?;
        let type_args = match elements.node(K::TypeArgumentList) {
            Some(list) => Some(self.type_arguments(&list)?),
            None => None,
        };
        elements.finish()?;
        let extras = self.close();
        let piece = SimpleTypePiece {
            name,
            type_args,
            extras,
        };
        pieces.push(self.created(piece, reference));
        Ok(())
    }

    /// `T?`: the inner reference has no modifiers of its own
    fn nullable_type(&mut self, node: &KtSyntaxNode) -> Result<NullableType> {
        self.open();
        let mut elements = Elements::new(node);
        let element = elements.expect_any_node()?;

        self.open();
        let target = self.type_ref_target(&element)?;
        let extras = self.close();
        let inner = TypeRef {
            modifiers: Vec::new(),
            target,
            extras,
        };
        let inner = Box::new(self.created(inner, element));

        let question = elements.expect_token(K::Question)?;
        self.own(&question)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(NullableType { inner, extras }, node.clone()))
    }

    fn function_type(&mut self, node: &KtSyntaxNode) -> Result<FunctionType> {
        self.open();
        let mut elements = Elements::new(node);

        let context_receiver = match elements.node(K::ContextReceiverList) {
            Some(list) => {
                self.open();
                let mut inner = Elements::new(&list);
                let keyword = inner.expect_token(K::SoftKw)?;
                self.own(&keyword)?;
                let receivers = self.comma_list(
                    &mut inner,
                    Some("("),
                    Some(")"),
                    |kind| kind == K::TypeReference,
                    |c, receiver| c.type_ref(receiver),
                )?;
                inner.finish()?;
                let extras = self.close();
                Some(self.created(ContextReceiver { receivers, extras }, list))
            }
            None => None,
        };

        let receiver = match elements.node(K::FunctionTypeReceiver) {
            Some(receiver) => {
                let mut inner = Elements::new(&receiver);
                let type_ref = inner.expect_node(K::TypeReference)?;
                let type_ref = self.type_ref(&type_ref)?;
                inner.finish()?;
                let dot = elements.expect_token(K::Dot)?;
                self.own(&dot)?;
                Some(Box::new(type_ref))
            }
            None => None,
        };

        let list = elements.expect_node(K::ValueParameterList)?;
        let mut inner = Elements::new(&list);
        let params = self.comma_list(
            &mut inner,
            Some("("),
            Some(")"),
            |kind| kind == K::FunctionTypeParameter,
            |c, param| c.function_type_param(param),
        )?;
        inner.finish()?;

        let arrow = elements.expect_token(K::Arrow)?;
        self.own(&arrow)?;
        let return_type = elements.expect_node(K::TypeReference)?;
        let return_type = Box::new(self.type_ref(&return_type)?);
        elements.finish()?;

        let extras = self.close();
        let function = FunctionType {
            context_receiver,
            receiver,
            params,
            return_type,
            extras,
        };
        Ok(self.created(function, node.clone()))
    }

    fn function_type_param(&mut self, node: &KtSyntaxNode) -> Result<FunctionTypeParam> {
        self.open();
        let mut elements = Elements::new(node);
        let name = match elements.token(K::Ident) {
            Some(ident) => {
                let name = self.name(&ident)?;
                let colon = elements.expect_token(K::Colon)?;
                self.own(&colon)?;
                Some(name)
            }
            None => None,
        };
        let type_ref = elements.expect_node(K::TypeReference)?;
        let type_ref = self.type_ref(&type_ref)?;
        elements.finish()?;

        let extras = self.close();
        let param = FunctionTypeParam {
            name,
            type_ref,
            extras,
        };
        Ok(self.created(param, node.clone()))
    }

    // ==================
    // Type arguments and parameters
    // ==================

    pub(super) fn type_arguments(
        &mut self,
        list: &KtSyntaxNode,
    ) -> Result<CommaSeparatedNodeList<TypeArgument>> {
        let mut elements = Elements::new(list);
        let args = self.comma_list(
            &mut elements,
            Some("<"),
            Some(">"),
            |kind| kind == K::TypeProjection,
            |c, projection| c.type_argument(projection),
        )?;
        elements.finish()?;
        Ok(args)
    }

    fn type_argument(&mut self, node: &KtSyntaxNode) -> Result<TypeArgument> {
        self.open();
        let mut elements = Elements::new(node);
        let argument = match elements.token(K::Star) {
            Some(star) => {
                self.own(&star)?;
                elements.finish()?;
                let extras = self.close();
                TypeArgument::Asterisk(self.created(StarProjection { extras }, node.clone()))
            }
            None => {
                let modifiers = self.modifiers(&mut elements)?;
                let type_ref = elements.expect_node(K::TypeReference)?;
                let type_ref = self.type_ref(&type_ref)?;
                elements.finish()?;
                let extras = self.close();
                let projection = TypeProjection {
                    modifiers,
                    type_ref,
                    extras,
                };
                TypeArgument::Type(self.created(projection, node.clone()))
            }
        };
        Ok(argument)
    }

    pub(super) fn type_params_opt(
        &mut self,
        elements: &mut Elements,
    ) -> Result<Option<CommaSeparatedNodeList<TypeParam>>> {
        let Some(list) = elements.node(K::TypeParameterList) else {
            return Ok(None);
        };
        let mut inner = Elements::new(&list);
        let params = self.comma_list(
            &mut inner,
            Some("<"),
            Some(">"),
            |kind| kind == K::TypeParameter,
            |c, param| c.type_param(param),
        )?;
        inner.finish()?;
        Ok(Some(params))
    }

    fn type_param(&mut self, node: &KtSyntaxNode) -> Result<TypeParam> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let ident = elements.expect_token(K::Ident)?;
        let name = self.name(&ident)?;
        let type_ref = match elements.token(K::Colon) {
            Some(colon) => {
                self.own(&colon)?;
                let bound = elements.expect_node(K::TypeReference)?;
                Some(self.type_ref(&bound)?)
            }
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let param = TypeParam {
            modifiers,
            name,
            type_ref,
            extras,
        };
        Ok(self.created(param, node.clone()))
    }

    // ==================
    // Constraints and contracts
    // ==================

    pub(super) fn type_constraint_set(&mut self, node: &KtSyntaxNode) -> Result<TypeConstraintSet> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::SoftKw)?;
        self.own(&keyword)?;
        let constraints = self.comma_list(
            &mut elements,
            None,
            None,
            |kind| kind == K::TypeConstraint,
            |c, constraint| c.type_constraint(constraint),
        )?;
        elements.finish()?;

        let extras = self.close();
        let set = TypeConstraintSet {
            constraints,
            extras,
        };
        Ok(self.created(set, node.clone()))
    }

    fn type_constraint(&mut self, node: &KtSyntaxNode) -> Result<TypeConstraint> {
        self.open();
        let mut elements = Elements::new(node);
        let mut annotation_sets = Vec::new();
        if let Some(list) = elements.node(K::ModifierList) {
            let mut inner = Elements::new(&list);
            while let Some(set) = inner.node(K::AnnotationSet) {
                annotation_sets.push(self.annotation_set(&set)?);
            }
            if inner.peek().is_some() {
                return Err(KastError::unsupported(
                    "unsupported syntax: only annotations may precede a constrained type parameter",
                ));
            }
        }
        let ident = elements.expect_token(K::Ident)?;
        let name = self.name(&ident)?;
        let colon = elements.expect_token(K::Colon)?;
        self.own(&colon)?;
        let type_ref = elements.expect_node(K::TypeReference)?;
        let type_ref = self.type_ref(&type_ref)?;
        elements.finish()?;

        let extras = self.close();
        let constraint = TypeConstraint {
            annotation_sets,
            name,
            type_ref,
            extras,
        };
        Ok(self.created(constraint, node.clone()))
    }

    pub(super) fn contract(&mut self, node: &KtSyntaxNode) -> Result<Contract> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::SoftKw)?;
        self.own(&keyword)?;
        let effects = self.comma_list(
            &mut elements,
            Some("["),
            Some("]"),
            |kind| kind == K::ContractEffect,
            |c, effect| {
                c.open();
                let mut inner = Elements::new(effect);
                let expression = c.boxed(&mut inner)?;
                inner.finish()?;
                let extras = c.close();
                Ok(c.created(ContractEffect { expression, extras }, effect.clone()))
            },
        )?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(Contract { effects, extras }, node.clone()))
    }

    // ==================
    // Annotations
    // ==================

    pub(super) fn annotation_set(&mut self, node: &KtSyntaxNode) -> Result<AnnotationSet> {
        self.open();
        let mut elements = Elements::new(node);
        let at = elements.expect_token(K::At)?;
        self.own(&at)?;
        let target = match elements.token(K::SoftKw) {
            Some(target) => {
                let target = self.keyword(&target)?;
                let colon = elements.expect_token(K::Colon)?;
                self.own(&colon)?;
                Some(target)
            }
            None => None,
        };
        let (prefix, suffix) = if elements.at(K::LBracket) {
            (Some("["), Some("]"))
        } else {
            (None, None)
        };
        let annotations = self.node_list(
            &mut elements,
            prefix,
            suffix,
            |kind| kind == K::AnnotationEntry,
            |c, entry| c.annotation(entry),
        )?;
        elements.finish()?;

        let extras = self.close();
        let set = AnnotationSet {
            target,
            annotations,
            extras,
        };
        Ok(self.created(set, node.clone()))
    }

    fn annotation(&mut self, node: &KtSyntaxNode) -> Result<Annotation> {
        self.open();
        let mut elements = Elements::new(node);
        let callee = elements.expect_node(K::ConstructorCallee)?;
        let constructor_callee = self.constructor_callee(&callee)?;
        let args = match elements.node(K::ValueArgumentList) {
            Some(list) => Some(self.value_arguments(&list)?),
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let annotation = Annotation {
            constructor_callee,
            args,
            extras,
        };
        Ok(self.created(annotation, node.clone()))
    }

    pub(super) fn constructor_callee(&mut self, node: &KtSyntaxNode) -> Result<ConstructorCallee> {
        self.open();
        let mut elements = Elements::new(node);
        let type_ref = elements.expect_node(K::TypeReference)?;
        let type_ref = self.type_ref(&type_ref)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(ConstructorCallee { type_ref, extras }, node.clone()))
    }
}
