//! Functions, properties, parameters and modifiers

use super::{Converter, Elements};
use crate::ast::{
    Accessor, CommaSeparatedNodeList, ExpressionBody, FunctionBody, FunctionDeclaration,
    FunctionParam, Getter, Modifier, MultiVariable, PostModifier, PropertyDeclaration,
    PropertyDelegate, Setter, SingleVariable, TypeRef, Variable,
};
use crate::cst::{KtSyntaxKind, KtSyntaxNode};
use crate::error::KastError;
use crate::result::Result;

use KtSyntaxKind as K;

impl Converter<'_> {
    // ==================
    // Functions
    // ==================

    /// Named functions, and the function of an anonymous function expression
    pub(super) fn function(&mut self, node: &KtSyntaxNode) -> Result<FunctionDeclaration> {
        let mut elements = Elements::new(node);
        if type_params_follow_name(node) {
            return Err(KastError::unsupported("type parameters after function name"));
        }

        self.open();
        let modifiers = self.modifiers(&mut elements)?;
        let keyword = elements.expect_token(K::FunKw)?;
        self.own(&keyword)?;
        let type_params = self.type_params_opt(&mut elements)?;
        let receiver_type = self.receiver_opt(&mut elements)?;
        let name = match elements.token(K::Ident) {
            Some(ident) => Some(self.name(&ident)?),
            None => None,
        };
        let list = elements.expect_node(K::ValueParameterList)?;
        let params = self.function_params(&list)?;
        let return_type = self.type_annotation_opt(&mut elements)?;

        let mut post_modifiers = Vec::new();
        loop {
            if let Some(list) = elements.node(K::TypeConstraintList) {
                post_modifiers.push(PostModifier::TypeConstraintSet(
                    self.type_constraint_set(&list)?,
                ));
            } else if let Some(list) = elements.node(K::ContractEffectList) {
                post_modifiers.push(PostModifier::Contract(self.contract(&list)?));
            } else {
                break;
            }
        }

        let body = self.function_body_opt(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        let function = FunctionDeclaration {
            modifiers,
            type_params,
            receiver_type,
            name,
            params,
            return_type,
            post_modifiers,
            body,
            extras,
        };
        Ok(self.created(function, node.clone()))
    }

    /// `Receiver.` in front of an extension name
    fn receiver_opt(&mut self, elements: &mut Elements) -> Result<Option<TypeRef>> {
        let Some(receiver) = elements.node(K::TypeReference) else {
            return Ok(None);
        };
        let receiver = self.type_ref(&receiver)?;
        let dot = elements.expect_token(K::Dot)?;
        self.own(&dot)?;
        Ok(Some(receiver))
    }

    /// `: Type` owned by the enclosing node
    fn type_annotation_opt(&mut self, elements: &mut Elements) -> Result<Option<TypeRef>> {
        let Some(colon) = elements.token(K::Colon) else {
            return Ok(None);
        };
        self.own(&colon)?;
        let type_ref = elements.expect_node(K::TypeReference)?;
        Ok(Some(self.type_ref(&type_ref)?))
    }

    /// A block body or an `= expression` body
    fn function_body_opt(&mut self, elements: &mut Elements) -> Result<Option<FunctionBody>> {
        if let Some(block) = elements.node(K::Block) {
            return Ok(Some(FunctionBody::Block(self.block(&block)?)));
        }
        let Some(eq) = elements.token(K::Eq) else {
            return Ok(None);
        };
        self.open();
        self.own(&eq)?;
        let expression = elements.expect_any_node()?;
        let converted = Box::new(self.expression(&expression)?);
        let extras = self.close();
        let body = ExpressionBody {
            expression: converted,
            extras,
        };
        Ok(Some(FunctionBody::Expression(self.created(body, expression))))
    }

    pub(super) fn function_params(
        &mut self,
        list: &KtSyntaxNode,
    ) -> Result<CommaSeparatedNodeList<FunctionParam>> {
        let mut elements = Elements::new(list);
        let params = self.comma_list(
            &mut elements,
            Some("("),
            Some(")"),
            |kind| kind == K::ValueParameter,
            |c, param| c.function_param(param),
        )?;
        elements.finish()?;
        Ok(params)
    }

    fn function_param(&mut self, node: &KtSyntaxNode) -> Result<FunctionParam> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let val_or_var = match elements.token(K::ValKw).or_else(|| elements.token(K::VarKw)) {
            Some(keyword) => Some(self.keyword(&keyword)?),
            None => None,
        };
        let ident = elements.expect_token(K::Ident)?;
        let name = self.name(&ident)?;
        let type_ref = self.type_annotation_opt(&mut elements)?;
        let default_value = match elements.token(K::Eq) {
            Some(eq) => {
                self.own(&eq)?;
                let value = elements.expect_any_node()?;
                Some(Box::new(self.expression(&value)?))
            }
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let param = FunctionParam {
            modifiers,
            val_or_var,
            name,
            type_ref,
            default_value,
            extras,
        };
        Ok(self.created(param, node.clone()))
    }

    // ==================
    // Properties
    // ==================

    pub(super) fn property(&mut self, node: &KtSyntaxNode) -> Result<PropertyDeclaration> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let keyword = elements
            .token(K::ValKw)
            .or_else(|| elements.token(K::VarKw))
            .ok_or_else(|| elements.unexpected("'val' or 'var'"))?;
        let val_or_var = self.keyword(&keyword)?;
        let type_params = self.type_params_opt(&mut elements)?;
        let receiver_type = self.receiver_opt(&mut elements)?;

        let variable = match elements.node(K::DestructuringDeclaration) {
            Some(destructuring) => Variable::Multi(self.multi_variable(&destructuring)?),
            None => {
                self.open();
                let ident = elements.expect_token(K::Ident)?;
                let name = self.name(&ident)?;
                let type_ref = self.type_annotation_opt(&mut elements)?;
                let extras = self.close();
                let single = SingleVariable {
                    name,
                    type_ref,
                    extras,
                };
                Variable::Single(self.created(single, ident))
            }
        };

        let type_constraint_set = match elements.node(K::TypeConstraintList) {
            Some(list) => Some(self.type_constraint_set(&list)?),
            None => None,
        };
        let initializer = match elements.token(K::Eq) {
            Some(eq) => {
                self.own(&eq)?;
                let value = elements.expect_any_node()?;
                Some(Box::new(self.expression(&value)?))
            }
            None => None,
        };
        let delegate = match elements.node(K::PropertyDelegate) {
            Some(delegate) => {
                self.open();
                let mut inner = Elements::new(&delegate);
                let by = inner.expect_token(K::SoftKw)?;
                self.own(&by)?;
                let value = inner.expect_any_node()?;
                let expression = Box::new(self.expression(&value)?);
                inner.finish()?;
                let extras = self.close();
                Some(self.created(PropertyDelegate { expression, extras }, delegate))
            }
            None => None,
        };

        let mut accessors = Vec::new();
        while let Some(accessor) = elements.node(K::PropertyAccessor) {
            accessors.push(self.accessor(&accessor)?);
        }
        elements.finish()?;

        let extras = self.close();
        let property = PropertyDeclaration {
            modifiers,
            val_or_var,
            type_params,
            receiver_type,
            variable,
            type_constraint_set,
            initializer,
            delegate,
            accessors,
            extras,
        };
        Ok(self.created(property, node.clone()))
    }

    fn accessor(&mut self, node: &KtSyntaxNode) -> Result<Accessor> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let keyword = elements.expect_token(K::SoftKw)?;
        self.own(&keyword)?;
        let params = match elements.node(K::ValueParameterList) {
            Some(list) => Some(self.function_params(&list)?),
            None => None,
        };
        let type_ref = self.type_annotation_opt(&mut elements)?;
        let body = self.function_body_opt(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        let accessor = if keyword.text() == "get" {
            let getter = Getter {
                modifiers,
                params,
                type_ref,
                body,
                extras,
            };
            Accessor::Getter(self.created(getter, node.clone()))
        } else {
            let setter = Setter {
                modifiers,
                params,
                type_ref,
                body,
                extras,
            };
            Accessor::Setter(self.created(setter, node.clone()))
        };
        Ok(accessor)
    }

    /// Loop and lambda parameters
    pub(super) fn variable(&mut self, node: &KtSyntaxNode) -> Result<Variable> {
        match node.kind() {
            K::DestructuringDeclaration => Ok(Variable::Multi(self.multi_variable(node)?)),
            K::ValueParameter => {
                let mut elements = Elements::new(node);
                if elements.at(K::ModifierList)
                    || node.children_with_tokens().any(|element| {
                        matches!(element.kind(), K::ValKw | K::VarKw | K::Eq)
                    })
                {
                    return Err(KastError::unsupported(
                        "unsupported syntax: modifiers or default value on a loop or lambda parameter",
                    ));
                }
                self.open();
                let ident = elements.expect_token(K::Ident)?;
                let name = self.name(&ident)?;
                let type_ref = self.type_annotation_opt(&mut elements)?;
                elements.finish()?;
                let extras = self.close();
                let single = SingleVariable {
                    name,
                    type_ref,
                    extras,
                };
                Ok(Variable::Single(self.created(single, node.clone())))
            }
            kind => Err(KastError::unsupported(format!(
                "unsupported syntax: {kind} is not a variable"
            ))),
        }
    }

    fn multi_variable(&mut self, node: &KtSyntaxNode) -> Result<MultiVariable> {
        self.open();
        let mut elements = Elements::new(node);
        let variables = self.comma_list(
            &mut elements,
            Some("("),
            Some(")"),
            |kind| kind == K::DestructuringDeclarationEntry,
            |c, entry| {
                c.open();
                let mut inner = Elements::new(entry);
                let ident = inner.expect_token(K::Ident)?;
                let name = c.name(&ident)?;
                let type_ref = c.type_annotation_opt(&mut inner)?;
                inner.finish()?;
                let extras = c.close();
                let single = SingleVariable {
                    name,
                    type_ref,
                    extras,
                };
                Ok(c.created(single, entry.clone()))
            },
        )?;
        let type_ref = self.type_annotation_opt(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        let multi = MultiVariable {
            variables,
            type_ref,
            extras,
        };
        Ok(self.created(multi, node.clone()))
    }

    // ==================
    // Modifiers
    // ==================

    pub(super) fn modifiers(&mut self, elements: &mut Elements) -> Result<Vec<Modifier>> {
        let Some(list) = elements.node(K::ModifierList) else {
            return Ok(Vec::new());
        };
        let mut inner = Elements::new(&list);
        let mut modifiers = Vec::new();
        while inner.peek().is_some() {
            if let Some(set) = inner.node(K::AnnotationSet) {
                modifiers.push(Modifier::AnnotationSet(self.annotation_set(&set)?));
            } else if let Some(token) = inner.any_token() {
                modifiers.push(Modifier::Keyword(self.keyword(&token)?));
            } else {
                inner.finish()?;
            }
        }
        Ok(modifiers)
    }
}

/// Whether a type parameter list comes after the function name
fn type_params_follow_name(node: &KtSyntaxNode) -> bool {
    let mut seen_name = false;
    for element in node.children_with_tokens() {
        match element.kind() {
            K::Ident => seen_name = true,
            K::TypeParameterList if seen_name => return true,
            K::ValueParameterList => return false,
            _ => {}
        }
    }
    false
}
