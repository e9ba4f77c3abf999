//! Expressions, statements and their supporting nodes

use super::{Converter, Elements};
use crate::ast::{
    AnnotatedExpression, AnonymousFunctionExpression, ArrayAccessExpression, BinaryExpression,
    BinaryOperator, Block, BreakExpression, CallExpression, CallableReferenceExpression,
    ClassLiteralExpression, CollectionLiteralExpression, CommaSeparatedNodeList,
    ConstantExpression, ConstantKind, ContinueExpression, DoubleColonReceiver, Expression,
    LabeledExpression, LambdaArg, LambdaBody, LambdaExpression, LongTemplateEntry, Name,
    ObjectExpression, ParenthesizedExpression, RegularEscapeEntry, RegularStringEntry,
    ReturnExpression, ShortTemplateEntry, StringEntry, StringTemplate, SuperExpression,
    ThisExpression, ThrowExpression, TypeOpExpression, UnaryExpression, UnicodeEscapeEntry,
    ValueArgument,
};
use crate::cst::{KtSyntaxKind, KtSyntaxNode, KtSyntaxToken};
use crate::error::KastError;
use crate::result::Result;

use KtSyntaxKind as K;

impl Converter<'_> {
    pub(super) fn expression(&mut self, node: &KtSyntaxNode) -> Result<Expression> {
        let expression = match node.kind() {
            K::BinaryExpression
            | K::DotQualifiedExpression
            | K::SafeAccessExpression => Expression::Binary(self.binary(node)?),
            K::PrefixExpression | K::PostfixExpression => Expression::Unary(self.unary(node)?),
            K::IsExpression | K::BinaryWithType => Expression::TypeOp(self.type_op(node)?),
            K::CallableReferenceExpression => {
                Expression::CallableReference(self.callable_reference(node)?)
            }
            K::ClassLiteralExpression => Expression::ClassLiteral(self.class_literal(node)?),
            K::Parenthesized => Expression::Parenthesized(self.parenthesized(node)?),
            K::StringTemplate => Expression::StringTemplate(self.string_template(node)?),
            K::BooleanConstant
            | K::CharacterConstant
            | K::IntegerConstant
            | K::FloatConstant
            | K::NullConstant => Expression::Constant(self.constant(node)?),
            K::LambdaExpression => Expression::Lambda(self.lambda(node)?),
            K::ThisExpression => Expression::This(self.this(node)?),
            K::SuperExpression => Expression::Super(self.super_expression(node)?),
            K::If => Expression::If(self.if_expression(node)?),
            K::When => Expression::When(self.when(node)?),
            K::Try => Expression::Try(self.try_expression(node)?),
            K::For => Expression::For(self.for_expression(node)?),
            K::While | K::DoWhile => Expression::While(self.while_expression(node)?),
            K::Throw => Expression::Throw(self.throw(node)?),
            K::Return => Expression::Return(self.return_expression(node)?),
            K::Continue => Expression::Continue(self.continue_expression(node)?),
            K::Break => Expression::Break(self.break_expression(node)?),
            K::ObjectLiteral => Expression::Object(self.object(node)?),
            K::AnonymousFunction => Expression::AnonymousFunction(self.anonymous_function(node)?),
            K::CollectionLiteralExpression => {
                Expression::CollectionLiteral(self.collection_literal(node)?)
            }
            K::ReferenceExpression => Expression::Name(self.reference(node)?),
            K::LabeledExpression => Expression::Labeled(self.labeled(node)?),
            K::AnnotatedExpression => Expression::Annotated(self.annotated(node)?),
            K::CallExpression => Expression::Call(self.call(node)?),
            K::ArrayAccessExpression => Expression::ArrayAccess(self.array_access(node)?),
            K::Block => Expression::Block(self.block(node)?),
            kind => {
                return Err(KastError::unsupported(format!(
                    "unsupported syntax: {kind} in expression position"
                )));
            }
        };
        Ok(expression)
    }

    pub(super) fn boxed(&mut self, elements: &mut Elements) -> Result<Box<Expression>> {
        let node = elements.expect_any_node()?;
        Ok(Box::new(self.expression(&node)?))
    }

    fn reference(&mut self, node: &KtSyntaxNode) -> Result<Name> {
        let mut elements = Elements::new(node);
        let ident = elements.expect_token(K::Ident)?;
        elements.finish()?;
        self.name(&ident)
    }

    /// `@label` after `this`, `super`, `return`, `break` or `continue`
    pub(super) fn label_qualifier_opt(&mut self, elements: &mut Elements) -> Result<Option<Name>> {
        let Some(qualifier) = elements.node(K::LabelQualifier) else {
            return Ok(None);
        };
        let mut inner = Elements::new(&qualifier);
        let at = inner.expect_token(K::At)?;
        self.own(&at)?;
        let ident = inner.expect_token(K::Ident)?;
        let label = self.name(&ident)?;
        inner.finish()?;
        Ok(Some(label))
    }

    // ==================
    // Operators
    // ==================

    fn binary(&mut self, node: &KtSyntaxNode) -> Result<BinaryExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let lhs = self.boxed(&mut elements)?;
        let operator = match elements.any_token() {
            Some(dot) => BinaryOperator::Token(self.keyword(&dot)?),
            None => {
                let reference = elements.expect_node(K::OperationReference)?;
                let token = operation_token(&reference)?;
                if token.kind() == K::Ident {
                    BinaryOperator::Infix(self.name(&token)?)
                } else {
                    BinaryOperator::Token(self.keyword(&token)?)
                }
            }
        };
        let rhs = self.boxed(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        let binary = BinaryExpression {
            lhs,
            operator,
            rhs,
            extras,
        };
        Ok(self.created(binary, node.clone()))
    }

    fn unary(&mut self, node: &KtSyntaxNode) -> Result<UnaryExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let prefix = node.kind() == K::PrefixExpression;
        let (operator, expression) = if prefix {
            let reference = elements.expect_node(K::OperationReference)?;
            let operator = self.keyword(&operation_token(&reference)?)?;
            (operator, self.boxed(&mut elements)?)
        } else {
            let expression = self.boxed(&mut elements)?;
            let reference = elements.expect_node(K::OperationReference)?;
            (self.keyword(&operation_token(&reference)?)?, expression)
        };
        elements.finish()?;

        let extras = self.close();
        let unary = UnaryExpression {
            operator,
            expression,
            prefix,
            extras,
        };
        Ok(self.created(unary, node.clone()))
    }

    fn type_op(&mut self, node: &KtSyntaxNode) -> Result<TypeOpExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let lhs = self.boxed(&mut elements)?;
        let reference = elements.expect_node(K::OperationReference)?;
        let operator = self.keyword(&operation_token(&reference)?)?;
        let rhs = elements.expect_node(K::TypeReference)?;
        let rhs = self.type_ref(&rhs)?;
        elements.finish()?;

        let extras = self.close();
        let type_op = TypeOpExpression {
            lhs,
            operator,
            rhs,
            extras,
        };
        Ok(self.created(type_op, node.clone()))
    }

    fn double_colon_receiver(&mut self, node: &KtSyntaxNode) -> Result<DoubleColonReceiver> {
        if node.kind() == K::TypeReference {
            Ok(DoubleColonReceiver::Type(self.type_ref(node)?))
        } else {
            Ok(DoubleColonReceiver::Expression(self.expression(node)?))
        }
    }

    fn callable_reference(&mut self, node: &KtSyntaxNode) -> Result<CallableReferenceExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let receiver = if elements.at(K::ColonColon) {
            None
        } else {
            let receiver = elements.expect_any_node()?;
            Some(Box::new(self.double_colon_receiver(&receiver)?))
        };
        let colons = elements.expect_token(K::ColonColon)?;
        self.own(&colons)?;
        let reference = elements.expect_node(K::ReferenceExpression)?;
        let name = self.reference(&reference)?;
        elements.finish()?;

        let extras = self.close();
        let callable = CallableReferenceExpression {
            receiver,
            name,
            extras,
        };
        Ok(self.created(callable, node.clone()))
    }

    fn class_literal(&mut self, node: &KtSyntaxNode) -> Result<ClassLiteralExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let receiver = elements.expect_any_node()?;
        let receiver = Box::new(self.double_colon_receiver(&receiver)?);
        let colons = elements.expect_token(K::ColonColon)?;
        self.own(&colons)?;
        let class = elements.expect_token(K::ClassKw)?;
        self.own(&class)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(ClassLiteralExpression { receiver, extras }, node.clone()))
    }

    fn parenthesized(&mut self, node: &KtSyntaxNode) -> Result<ParenthesizedExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let open = elements.expect_token(K::LParen)?;
        self.own(&open)?;
        let expression = self.boxed(&mut elements)?;
        let close = elements.expect_token(K::RParen)?;
        self.own(&close)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(ParenthesizedExpression { expression, extras }, node.clone()))
    }

    // ==================
    // Literals
    // ==================

    fn constant(&mut self, node: &KtSyntaxNode) -> Result<ConstantExpression> {
        let kind = match node.kind() {
            K::BooleanConstant => ConstantKind::Boolean,
            K::CharacterConstant => ConstantKind::Char,
            K::IntegerConstant => ConstantKind::Int,
            K::FloatConstant => ConstantKind::Float,
            _ => ConstantKind::Null,
        };
        self.open();
        let mut elements = Elements::new(node);
        let token = elements
            .any_token()
            .ok_or_else(|| elements.unexpected("a literal"))?;
        self.own(&token)?;
        elements.finish()?;

        let extras = self.close();
        let constant = ConstantExpression {
            kind,
            text: token.text().to_string(),
            extras,
        };
        Ok(self.created(constant, node.clone()))
    }

    fn string_template(&mut self, node: &KtSyntaxNode) -> Result<StringTemplate> {
        self.open();
        let mut elements = Elements::new(node);
        let open = elements.expect_token(K::OpenQuote)?;
        self.own(&open)?;
        let raw = open.text() == "\"\"\"";

        let mut entries = Vec::new();
        while let Some(entry) = elements.any_node() {
            entries.push(self.string_entry(&entry)?);
        }
        let close = elements.expect_token(K::ClosingQuote)?;
        self.own(&close)?;
        elements.finish()?;

        let extras = self.close();
        let template = StringTemplate {
            entries,
            raw,
            extras,
        };
        Ok(self.created(template, node.clone()))
    }

    fn string_entry(&mut self, node: &KtSyntaxNode) -> Result<StringEntry> {
        self.open();
        let mut elements = Elements::new(node);
        let entry = match node.kind() {
            K::LiteralStringTemplateEntry => {
                let part = elements.expect_token(K::RegularStringPart)?;
                self.own(&part)?;
                let extras = self.close();
                let text = part.text().to_string();
                StringEntry::Regular(self.created(RegularStringEntry { text, extras }, node.clone()))
            }
            K::EscapeStringTemplateEntry => {
                let escape = elements.expect_token(K::EscapeSequence)?;
                self.own(&escape)?;
                let extras = self.close();
                let text = escape.text();
                match text.strip_prefix("\\u") {
                    Some(digits) => {
                        let entry = UnicodeEscapeEntry {
                            digits: digits.to_string(),
                            extras,
                        };
                        StringEntry::UnicodeEscape(self.created(entry, node.clone()))
                    }
                    None => {
                        let entry = RegularEscapeEntry {
                            character: text.trim_start_matches('\\').to_string(),
                            extras,
                        };
                        StringEntry::RegularEscape(self.created(entry, node.clone()))
                    }
                }
            }
            K::ShortStringTemplateEntry => {
                let dollar = elements.expect_token(K::ShortTemplateEntryStart)?;
                self.own(&dollar)?;
                let name = elements
                    .any_token()
                    .ok_or_else(|| elements.unexpected("a template name"))?;
                self.own(&name)?;
                let extras = self.close();
                let entry = ShortTemplateEntry {
                    text: name.text().to_string(),
                    extras,
                };
                StringEntry::ShortTemplate(self.created(entry, node.clone()))
            }
            K::LongStringTemplateEntry => {
                let start = elements.expect_token(K::LongTemplateEntryStart)?;
                self.own(&start)?;
                let expression = self.boxed(&mut elements)?;
                let end = elements.expect_token(K::LongTemplateEntryEnd)?;
                self.own(&end)?;
                let extras = self.close();
                let entry = LongTemplateEntry { expression, extras };
                StringEntry::LongTemplate(self.created(entry, node.clone()))
            }
            kind => {
                return Err(KastError::unsupported(format!(
                    "unsupported syntax: {kind} in a string template"
                )));
            }
        };
        elements.finish()?;
        Ok(entry)
    }

    fn collection_literal(&mut self, node: &KtSyntaxNode) -> Result<CollectionLiteralExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let expressions = self.expression_list(&mut elements, "[", "]")?;
        elements.finish()?;

        let extras = self.close();
        let literal = CollectionLiteralExpression {
            expressions,
            extras,
        };
        Ok(self.created(literal, node.clone()))
    }

    fn expression_list(
        &mut self,
        elements: &mut Elements,
        prefix: &'static str,
        suffix: &'static str,
    ) -> Result<CommaSeparatedNodeList<Expression>> {
        self.comma_list(
            elements,
            Some(prefix),
            Some(suffix),
            |_| true,
            |c, node| c.expression(node),
        )
    }

    // ==================
    // Lambdas and blocks
    // ==================

    pub(super) fn block(&mut self, node: &KtSyntaxNode) -> Result<Block> {
        self.open();
        let mut elements = Elements::new(node);
        let open = elements.expect_token(K::LBrace)?;
        self.own(&open)?;
        let mut statements = Vec::new();
        while let Some(child) = elements.any_node() {
            statements.push(self.statement(&child)?);
        }
        let close = elements.expect_token(K::RBrace)?;
        self.own(&close)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(Block { statements, extras }, node.clone()))
    }

    pub(super) fn lambda(&mut self, node: &KtSyntaxNode) -> Result<LambdaExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let open = elements.expect_token(K::LBrace)?;
        self.own(&open)?;

        let params = match elements.node(K::LambdaParameterList) {
            Some(list) => {
                let mut inner = Elements::new(&list);
                let params = self.comma_list(
                    &mut inner,
                    None,
                    None,
                    |kind| matches!(kind, K::ValueParameter | K::DestructuringDeclaration),
                    |c, param| c.variable(param),
                )?;
                inner.finish()?;
                let arrow = elements.expect_token(K::Arrow)?;
                self.own(&arrow)?;
                Some(params)
            }
            None => None,
        };

        let body_node = elements.expect_node(K::LambdaBody)?;
        self.open();
        let mut inner = Elements::new(&body_node);
        let mut statements = Vec::new();
        while let Some(child) = inner.any_node() {
            statements.push(self.statement(&child)?);
        }
        inner.finish()?;
        let extras = self.close();
        let body = self.created(LambdaBody { statements, extras }, body_node);

        let close = elements.expect_token(K::RBrace)?;
        self.own(&close)?;
        elements.finish()?;

        let extras = self.close();
        let lambda = LambdaExpression {
            params,
            body,
            extras,
        };
        Ok(self.created(lambda, node.clone()))
    }

    fn this(&mut self, node: &KtSyntaxNode) -> Result<ThisExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::ThisKw)?;
        self.own(&keyword)?;
        let label = self.label_qualifier_opt(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(ThisExpression { label, extras }, node.clone()))
    }

    fn super_expression(&mut self, node: &KtSyntaxNode) -> Result<SuperExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::SuperKw)?;
        self.own(&keyword)?;
        let type_arg = match elements.token(K::Lt) {
            Some(lt) => {
                self.own(&lt)?;
                let type_ref = elements.expect_node(K::TypeReference)?;
                let type_ref = self.type_ref(&type_ref)?;
                let gt = elements.expect_token(K::Gt)?;
                self.own(&gt)?;
                Some(type_ref)
            }
            None => None,
        };
        let label = self.label_qualifier_opt(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        let expression = SuperExpression {
            type_arg,
            label,
            extras,
        };
        Ok(self.created(expression, node.clone()))
    }

    // ==================
    // Jumps and wrappers
    // ==================

    fn throw(&mut self, node: &KtSyntaxNode) -> Result<ThrowExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::ThrowKw)?;
        self.own(&keyword)?;
        let expression = self.boxed(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(ThrowExpression { expression, extras }, node.clone()))
    }

    fn return_expression(&mut self, node: &KtSyntaxNode) -> Result<ReturnExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::ReturnKw)?;
        self.own(&keyword)?;
        let label = self.label_qualifier_opt(&mut elements)?;
        let expression = match elements.any_node() {
            Some(value) => Some(Box::new(self.expression(&value)?)),
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let expression = ReturnExpression {
            label,
            expression,
            extras,
        };
        Ok(self.created(expression, node.clone()))
    }

    fn continue_expression(&mut self, node: &KtSyntaxNode) -> Result<ContinueExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::ContinueKw)?;
        self.own(&keyword)?;
        let label = self.label_qualifier_opt(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(ContinueExpression { label, extras }, node.clone()))
    }

    fn break_expression(&mut self, node: &KtSyntaxNode) -> Result<BreakExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::BreakKw)?;
        self.own(&keyword)?;
        let label = self.label_qualifier_opt(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(BreakExpression { label, extras }, node.clone()))
    }

    fn object(&mut self, node: &KtSyntaxNode) -> Result<ObjectExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let declaration = elements.expect_node(K::ObjectDeclaration)?;
        let declaration = Box::new(self.class(&declaration)?);
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(ObjectExpression { declaration, extras }, node.clone()))
    }

    fn anonymous_function(&mut self, node: &KtSyntaxNode) -> Result<AnonymousFunctionExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let function = elements.expect_node(K::Fun)?;
        let function = Box::new(self.function(&function)?);
        elements.finish()?;

        let extras = self.close();
        let expression = AnonymousFunctionExpression { function, extras };
        Ok(self.created(expression, node.clone()))
    }

    fn labeled(&mut self, node: &KtSyntaxNode) -> Result<LabeledExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let ident = elements.expect_token(K::Ident)?;
        let label = self.name(&ident)?;
        let at = elements.expect_token(K::At)?;
        self.own(&at)?;
        let expression = self.boxed(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        let labeled = LabeledExpression {
            label,
            expression,
            extras,
        };
        Ok(self.created(labeled, node.clone()))
    }

    fn annotated(&mut self, node: &KtSyntaxNode) -> Result<AnnotatedExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let mut annotation_sets = Vec::new();
        while let Some(set) = elements.node(K::AnnotationSet) {
            annotation_sets.push(self.annotation_set(&set)?);
        }
        let expression = self.boxed(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        let annotated = AnnotatedExpression {
            annotation_sets,
            expression,
            extras,
        };
        Ok(self.created(annotated, node.clone()))
    }

    // ==================
    // Calls
    // ==================

    fn call(&mut self, node: &KtSyntaxNode) -> Result<CallExpression> {
        let lambdas = node
            .children()
            .filter(|child| child.kind() == K::LambdaArgument)
            .count();
        if lambdas > 1 {
            return Err(KastError::unsupported("at most one lambda argument is allowed"));
        }

        self.open();
        let mut elements = Elements::new(node);
        let expression = self.boxed(&mut elements)?;
        let type_args = match elements.node(K::TypeArgumentList) {
            Some(list) => Some(self.type_arguments(&list)?),
            None => None,
        };
        let args = match elements.node(K::ValueArgumentList) {
            Some(list) => Some(self.value_arguments(&list)?),
            None => None,
        };
        let lambda_arg = match elements.node(K::LambdaArgument) {
            Some(argument) => Some(self.lambda_argument(&argument)?),
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let call = CallExpression {
            expression,
            type_args,
            args,
            lambda_arg,
            extras,
        };
        Ok(self.created(call, node.clone()))
    }

    fn lambda_argument(&mut self, node: &KtSyntaxNode) -> Result<LambdaArg> {
        self.open();
        let mut elements = Elements::new(node);
        let mut annotation_sets = Vec::new();
        let mut inner = elements.expect_any_node()?;
        if inner.kind() == K::AnnotatedExpression {
            let mut annotated = Elements::new(&inner);
            while let Some(set) = annotated.node(K::AnnotationSet) {
                annotation_sets.push(self.annotation_set(&set)?);
            }
            let target = annotated.expect_any_node()?;
            annotated.finish()?;
            inner = target;
        }

        let mut label = None;
        if inner.kind() == K::LabeledExpression {
            let mut labeled = Elements::new(&inner);
            let ident = labeled.expect_token(K::Ident)?;
            label = Some(self.name(&ident)?);
            let at = labeled.expect_token(K::At)?;
            self.own(&at)?;
            let target = labeled.expect_any_node()?;
            labeled.finish()?;
            inner = target;
        }

        if inner.kind() != K::LambdaExpression {
            return Err(KastError::unsupported("lambda argument must be a lambda expression"));
        }
        let lambda = self.lambda(&inner)?;
        elements.finish()?;

        let extras = self.close();
        let argument = LambdaArg {
            annotation_sets,
            label,
            lambda,
            extras,
        };
        Ok(self.created(argument, node.clone()))
    }

    pub(super) fn value_arguments(
        &mut self,
        list: &KtSyntaxNode,
    ) -> Result<CommaSeparatedNodeList<ValueArgument>> {
        let mut elements = Elements::new(list);
        let args = self.comma_list(
            &mut elements,
            Some("("),
            Some(")"),
            |kind| kind == K::ValueArgument,
            |c, argument| c.value_argument(argument),
        )?;
        elements.finish()?;
        Ok(args)
    }

    fn value_argument(&mut self, node: &KtSyntaxNode) -> Result<ValueArgument> {
        self.open();
        let mut elements = Elements::new(node);
        let name = match elements.token(K::Ident) {
            Some(ident) => {
                let name = self.name(&ident)?;
                let eq = elements.expect_token(K::Eq)?;
                self.own(&eq)?;
                Some(name)
            }
            None => None,
        };
        let spread = match elements.token(K::Star) {
            Some(star) => {
                self.own(&star)?;
                true
            }
            None => false,
        };
        let expression = self.boxed(&mut elements)?;
        elements.finish()?;

        let extras = self.close();
        let argument = ValueArgument {
            name,
            spread,
            expression,
            extras,
        };
        Ok(self.created(argument, node.clone()))
    }

    fn array_access(&mut self, node: &KtSyntaxNode) -> Result<ArrayAccessExpression> {
        self.open();
        let mut elements = Elements::new(node);
        let expression = self.boxed(&mut elements)?;
        let indices = elements.expect_node(K::Indices)?;
        let mut inner = Elements::new(&indices);
        let indices = self.expression_list(&mut inner, "[", "]")?;
        inner.finish()?;
        elements.finish()?;

        let extras = self.close();
        let access = ArrayAccessExpression {
            expression,
            indices,
            extras,
        };
        Ok(self.created(access, node.clone()))
    }
}

/// The single token inside an `OperationReference`
fn operation_token(node: &KtSyntaxNode) -> Result<KtSyntaxToken> {
    let mut elements = Elements::new(node);
    let token = elements
        .any_token()
        .ok_or_else(|| elements.unexpected("an operator"))?;
    elements.finish()?;
    Ok(token)
}
