//! Control flow: `if`, `when`, `try` and loops

use super::{Converter, Elements};
use crate::ast::{
    CatchClause, Expression, ForExpression, IfExpression, PropertyExpression, TryExpression,
    WhenCondition, WhenConditionsEntry, WhenElseEntry, WhenEntry, WhenExpression,
    WhenExpressionCondition, WhenInCondition, WhenIsCondition, WhenSubject, WhileExpression,
};
use crate::cst::{KtSyntaxKind, KtSyntaxNode};
use crate::error::KastError;
use crate::result::Result;

use KtSyntaxKind as K;

impl Converter<'_> {
    /// `( condition )` owned by the enclosing node
    fn condition(&mut self, elements: &mut Elements) -> Result<Box<Expression>> {
        let open = elements.expect_token(K::LParen)?;
        self.own(&open)?;
        let condition = self.boxed(elements)?;
        let close = elements.expect_token(K::RParen)?;
        self.own(&close)?;
        Ok(condition)
    }

    pub(super) fn if_expression(&mut self, node: &KtSyntaxNode) -> Result<IfExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::IfKw)?;
        self.own(&keyword)?;
        let condition = self.condition(&mut elements)?;
        let Some(body) = elements.any_node() else {
            return Err(KastError::unsupported("if expression without a then-branch"));
        };
        let body = Box::new(self.expression(&body)?);
        let else_body = match elements.token(K::ElseKw) {
            Some(keyword) => {
                self.own(&keyword)?;
                let Some(else_body) = elements.any_node() else {
                    return Err(KastError::unsupported("if expression with an empty else-branch"));
                };
                Some(Box::new(self.expression(&else_body)?))
            }
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let expression = IfExpression {
            condition,
            body,
            else_body,
            extras,
        };
        Ok(self.created(expression, node.clone()))
    }

    pub(super) fn try_expression(&mut self, node: &KtSyntaxNode) -> Result<TryExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::TryKw)?;
        self.own(&keyword)?;
        let block = elements.expect_node(K::Block)?;
        let block = self.block(&block)?;

        let mut catches = Vec::new();
        while let Some(catch) = elements.node(K::Catch) {
            self.open();
            let mut inner = Elements::new(&catch);
            let keyword = inner.expect_token(K::SoftKw)?;
            self.own(&keyword)?;
            let list = inner.expect_node(K::ValueParameterList)?;
            let params = self.function_params(&list)?;
            let block = inner.expect_node(K::Block)?;
            let block = self.block(&block)?;
            inner.finish()?;
            let extras = self.close();
            let clause = CatchClause {
                params,
                block,
                extras,
            };
            catches.push(self.created(clause, catch));
        }

        let finally_block = match elements.node(K::Finally) {
            Some(finally) => {
                let mut inner = Elements::new(&finally);
                let keyword = inner.expect_token(K::SoftKw)?;
                self.own(&keyword)?;
                let block = inner.expect_node(K::Block)?;
                let block = self.block(&block)?;
                inner.finish()?;
                Some(block)
            }
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let expression = TryExpression {
            block,
            catches,
            finally_block,
            extras,
        };
        Ok(self.created(expression, node.clone()))
    }

    pub(super) fn for_expression(&mut self, node: &KtSyntaxNode) -> Result<ForExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::ForKw)?;
        self.own(&keyword)?;
        let open = elements.expect_token(K::LParen)?;
        self.own(&open)?;
        let variable = elements.expect_any_node()?;
        let variable = self.variable(&variable)?;
        let in_keyword = elements.expect_token(K::InKw)?;
        self.own(&in_keyword)?;
        let iterable = self.boxed(&mut elements)?;
        let close = elements.expect_token(K::RParen)?;
        self.own(&close)?;
        let Some(body) = elements.any_node() else {
            return Err(KastError::unsupported("for loop without a body"));
        };
        let body = Box::new(self.expression(&body)?);
        elements.finish()?;

        let extras = self.close();
        let expression = ForExpression {
            variable,
            iterable,
            body,
            extras,
        };
        Ok(self.created(expression, node.clone()))
    }

    /// `while (c) body` and `do body while (c)`
    pub(super) fn while_expression(&mut self, node: &KtSyntaxNode) -> Result<WhileExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let do_while = node.kind() == K::DoWhile;
        let (condition, body) = if do_while {
            let keyword = elements.expect_token(K::DoKw)?;
            self.own(&keyword)?;
            let body = match elements.any_node() {
                Some(body) => Some(Box::new(self.expression(&body)?)),
                None => None,
            };
            let keyword = elements.expect_token(K::WhileKw)?;
            self.own(&keyword)?;
            (self.condition(&mut elements)?, body)
        } else {
            let keyword = elements.expect_token(K::WhileKw)?;
            self.own(&keyword)?;
            let condition = self.condition(&mut elements)?;
            let body = match elements.any_node() {
                Some(body) => Some(Box::new(self.expression(&body)?)),
                None => None,
            };
            (condition, body)
        };
        elements.finish()?;

        let extras = self.close();
        let expression = WhileExpression {
            condition,
            body,
            do_while,
            extras,
        };
        Ok(self.created(expression, node.clone()))
    }

    // ==================
    // When
    // ==================

    pub(super) fn when(&mut self, node: &KtSyntaxNode) -> Result<WhenExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::WhenKw)?;
        self.own(&keyword)?;

        let subject = match elements.token(K::LParen) {
            Some(open) => {
                self.open();
                self.own(&open)?;
                let subject = elements.expect_any_node()?;
                let expression = Box::new(self.when_subject(&subject)?);
                let close = elements.expect_token(K::RParen)?;
                self.own(&close)?;
                let extras = self.close();
                Some(self.created(WhenSubject { expression, extras }, subject))
            }
            None => None,
        };

        let entries = self.node_list(
            &mut elements,
            Some("{"),
            Some("}"),
            |kind| kind == K::WhenEntry,
            |c, entry| c.when_entry(entry),
        )?;
        elements.finish()?;

        let extras = self.close();
        let expression = WhenExpression {
            subject,
            entries,
            extras,
        };
        Ok(self.created(expression, node.clone()))
    }

    fn when_subject(&mut self, node: &KtSyntaxNode) -> Result<Expression> {
        if node.kind() != K::Property {
            return self.expression(node);
        }
        if node
            .children()
            .any(|child| child.kind() == K::DestructuringDeclaration)
        {
            return Err(KastError::unsupported("destructuring declaration as when-subject"));
        }
        self.open();
        let declaration = Box::new(self.property(node)?);
        let extras = self.close();
        let expression = PropertyExpression {
            declaration,
            extras,
        };
        Ok(Expression::Property(self.created(expression, node.clone())))
    }

    fn when_entry(&mut self, node: &KtSyntaxNode) -> Result<WhenEntry> {
        self.open();
        let mut elements = Elements::new(node);
        let entry = match elements.token(K::ElseKw) {
            Some(keyword) => {
                self.own(&keyword)?;
                let arrow = elements.expect_token(K::Arrow)?;
                self.own(&arrow)?;
                let body = self.boxed(&mut elements)?;
                elements.finish()?;
                let extras = self.close();
                WhenEntry::Else(self.created(WhenElseEntry { body, extras }, node.clone()))
            }
            None => {
                let conditions = self.comma_list(
                    &mut elements,
                    None,
                    None,
                    |kind| {
                        matches!(
                            kind,
                            K::WhenConditionExpression
                                | K::WhenConditionInRange
                                | K::WhenConditionIsPattern
                        )
                    },
                    |c, condition| c.when_condition(condition),
                )?;
                let arrow = elements.expect_token(K::Arrow)?;
                self.own(&arrow)?;
                let body = self.boxed(&mut elements)?;
                elements.finish()?;
                let extras = self.close();
                let entry = WhenConditionsEntry {
                    conditions,
                    body,
                    extras,
                };
                WhenEntry::Conditions(self.created(entry, node.clone()))
            }
        };
        Ok(entry)
    }

    fn when_condition(&mut self, node: &KtSyntaxNode) -> Result<WhenCondition> {
        self.open();
        let mut elements = Elements::new(node);
        let condition = match node.kind() {
            K::WhenConditionInRange => {
                let operator = elements
                    .any_token()
                    .ok_or_else(|| elements.unexpected("'in' or '!in'"))?;
                let operator = self.keyword(&operator)?;
                let expression = self.boxed(&mut elements)?;
                elements.finish()?;
                let extras = self.close();
                let condition = WhenInCondition {
                    operator,
                    expression,
                    extras,
                };
                WhenCondition::In(self.created(condition, node.clone()))
            }
            K::WhenConditionIsPattern => {
                let operator = elements
                    .any_token()
                    .ok_or_else(|| elements.unexpected("'is' or '!is'"))?;
                let operator = self.keyword(&operator)?;
                let type_ref = elements.expect_node(K::TypeReference)?;
                let type_ref = self.type_ref(&type_ref)?;
                elements.finish()?;
                let extras = self.close();
                let condition = WhenIsCondition {
                    operator,
                    type_ref,
                    extras,
                };
                WhenCondition::Is(self.created(condition, node.clone()))
            }
            _ => {
                let expression = self.boxed(&mut elements)?;
                elements.finish()?;
                let extras = self.close();
                let condition = WhenExpressionCondition { expression, extras };
                WhenCondition::Expression(self.created(condition, node.clone()))
            }
        };
        Ok(condition)
    }
}
