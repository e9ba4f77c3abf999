//! Types, modifiers, annotations and constraints

use super::WriteContext;
use crate::ast::{
    Annotation, AnnotationSet, ConstructorCallee, ContextReceiver, Contract, ContractEffect,
    DynamicType, FunctionType, FunctionTypeParam, Keyword, Modifier, NullableType, PostModifier,
    SimpleType, SimpleTypePiece, StarProjection, Type, TypeArgument, TypeConstraint,
    TypeConstraintSet, TypeParam, TypeProjection, TypeRef, TypeRefTarget, ValueArgument,
};

impl<'a> WriteContext<'a> {
    pub(super) fn keyword(&mut self, keyword: &'a Keyword) {
        self.node(&keyword.extras, |w| w.token(keyword.text()));
    }

    /// Each modifier followed by a space
    pub(super) fn modifiers(&mut self, modifiers: &'a [Modifier]) {
        for modifier in modifiers {
            match modifier {
                Modifier::AnnotationSet(set) => self.annotation_set(set),
                Modifier::Keyword(keyword) => self.keyword(keyword),
            }
            self.space();
        }
    }

    pub(super) fn post_modifier(&mut self, post_modifier: &'a PostModifier) {
        match post_modifier {
            PostModifier::TypeConstraintSet(set) => self.type_constraint_set(set),
            PostModifier::Contract(contract) => self.contract(contract),
        }
    }

    // ==================
    // Type references
    // ==================

    pub(super) fn type_ref(&mut self, type_ref: &'a TypeRef) {
        self.node(&type_ref.extras, |w| {
            w.modifiers(&type_ref.modifiers);
            match &type_ref.target {
                TypeRefTarget::Type(ty) => w.type_element(ty),
                TypeRefTarget::Parenthesized(inner) => {
                    w.token("(");
                    w.type_ref(inner);
                    w.token(")");
                }
            }
        });
    }

    fn type_element(&mut self, ty: &'a Type) {
        match ty {
            Type::Function(ty) => self.function_type(ty),
            Type::Simple(ty) => self.simple_type(ty),
            Type::Nullable(ty) => self.nullable_type(ty),
            Type::Dynamic(ty) => self.dynamic_type(ty),
        }
    }

    pub(super) fn function_type(&mut self, ty: &'a FunctionType) {
        self.node(&ty.extras, |w| {
            if let Some(context) = &ty.context_receiver {
                w.context_receiver(context);
                w.space();
            }
            if let Some(receiver) = &ty.receiver {
                w.type_ref(receiver);
                w.token(".");
            }
            w.comma_list(&ty.params, Self::function_type_param);
            w.space();
            w.token("->");
            w.space();
            w.type_ref(&ty.return_type);
        });
    }

    pub(super) fn context_receiver(&mut self, context: &'a ContextReceiver) {
        self.node(&context.extras, |w| {
            w.token("context");
            w.comma_list(&context.receivers, Self::type_ref);
        });
    }

    pub(super) fn function_type_param(&mut self, param: &'a FunctionTypeParam) {
        self.node(&param.extras, |w| {
            if let Some(name) = &param.name {
                w.name(name);
                w.token(":");
                w.space();
            }
            w.type_ref(&param.type_ref);
        });
    }

    pub(super) fn simple_type(&mut self, ty: &'a SimpleType) {
        self.node(&ty.extras, |w| {
            for (index, piece) in ty.pieces.iter().enumerate() {
                if index > 0 {
                    w.token(".");
                }
                w.simple_type_piece(piece);
            }
        });
    }

    pub(super) fn simple_type_piece(&mut self, piece: &'a SimpleTypePiece) {
        self.node(&piece.extras, |w| {
            w.name(&piece.name);
            if let Some(type_args) = &piece.type_args {
                w.comma_list(type_args, Self::type_argument);
            }
        });
    }

    pub(super) fn nullable_type(&mut self, ty: &'a NullableType) {
        self.node(&ty.extras, |w| {
            w.type_ref(&ty.inner);
            w.token("?");
        });
    }

    pub(super) fn dynamic_type(&mut self, ty: &'a DynamicType) {
        self.node(&ty.extras, |w| w.token("dynamic"));
    }

    // ==================
    // Type arguments and parameters
    // ==================

    pub(super) fn type_argument(&mut self, argument: &'a TypeArgument) {
        match argument {
            TypeArgument::Asterisk(star) => self.star_projection(star),
            TypeArgument::Type(projection) => self.type_projection(projection),
        }
    }

    pub(super) fn star_projection(&mut self, star: &'a StarProjection) {
        self.node(&star.extras, |w| w.token("*"));
    }

    pub(super) fn type_projection(&mut self, projection: &'a TypeProjection) {
        self.node(&projection.extras, |w| {
            w.modifiers(&projection.modifiers);
            w.type_ref(&projection.type_ref);
        });
    }

    pub(super) fn type_param(&mut self, param: &'a TypeParam) {
        self.node(&param.extras, |w| {
            w.modifiers(&param.modifiers);
            w.name(&param.name);
            if let Some(bound) = &param.type_ref {
                w.token(":");
                w.space();
                w.type_ref(bound);
            }
        });
    }

    pub(super) fn constructor_callee(&mut self, callee: &'a ConstructorCallee) {
        self.node(&callee.extras, |w| w.type_ref(&callee.type_ref));
    }

    pub(super) fn value_argument(&mut self, argument: &'a ValueArgument) {
        self.node(&argument.extras, |w| {
            if let Some(name) = &argument.name {
                w.name(name);
                w.space();
                w.token("=");
                w.space();
            }
            if argument.spread {
                w.token("*");
            }
            w.expression(&argument.expression);
        });
    }

    // ==================
    // Annotations
    // ==================

    pub(super) fn annotation_set(&mut self, set: &'a AnnotationSet) {
        self.node(&set.extras, |w| {
            w.token("@");
            if let Some(target) = &set.target {
                w.keyword(target);
                w.token(":");
            }
            w.node_list(&set.annotations, Self::space, Self::annotation);
        });
    }

    pub(super) fn annotation(&mut self, annotation: &'a Annotation) {
        self.node(&annotation.extras, |w| {
            w.constructor_callee(&annotation.constructor_callee);
            if let Some(args) = &annotation.args {
                w.comma_list(args, Self::value_argument);
            }
        });
    }

    // ==================
    // Constraints and contracts
    // ==================

    pub(super) fn type_constraint_set(&mut self, set: &'a TypeConstraintSet) {
        self.node(&set.extras, |w| {
            w.token("where");
            w.space();
            w.comma_list(&set.constraints, Self::type_constraint);
        });
    }

    pub(super) fn type_constraint(&mut self, constraint: &'a TypeConstraint) {
        self.node(&constraint.extras, |w| {
            for set in &constraint.annotation_sets {
                w.annotation_set(set);
                w.space();
            }
            w.name(&constraint.name);
            w.token(":");
            w.space();
            w.type_ref(&constraint.type_ref);
        });
    }

    pub(super) fn contract(&mut self, contract: &'a Contract) {
        self.node(&contract.extras, |w| {
            w.token("contract");
            w.space();
            w.comma_list(&contract.effects, Self::contract_effect);
        });
    }

    pub(super) fn contract_effect(&mut self, effect: &'a ContractEffect) {
        self.node(&effect.extras, |w| w.expression(&effect.expression));
    }
}
