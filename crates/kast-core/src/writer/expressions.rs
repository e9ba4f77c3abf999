//! Expressions, string templates, lambdas and control flow

use super::WriteContext;
use crate::ast::{
    AnnotatedExpression, AnonymousFunctionExpression, ArrayAccessExpression, BinaryExpression,
    BinaryOperator, Block, BreakExpression, CallExpression, CallableReferenceExpression,
    CatchClause, ClassLiteralExpression, CollectionLiteralExpression, ConstantExpression,
    ContinueExpression, DoubleColonReceiver, Expression, ForExpression, IfExpression,
    LabeledExpression, LambdaArg, LambdaBody, LambdaExpression, LongTemplateEntry, Name,
    ObjectExpression, ParenthesizedExpression, PropertyExpression, RegularEscapeEntry,
    RegularStringEntry, ReturnExpression, ShortTemplateEntry, Statement, StringEntry,
    StringTemplate, SuperExpression, ThisExpression, ThrowExpression, TryExpression,
    TypeOpExpression, UnaryExpression, UnicodeEscapeEntry, WhenCondition, WhenConditionsEntry,
    WhenElseEntry, WhenEntry, WhenExpression, WhenExpressionCondition, WhenInCondition,
    WhenIsCondition, WhenSubject, WhileExpression,
};

impl<'a> WriteContext<'a> {
    pub(super) fn expression(&mut self, expression: &'a Expression) {
        match expression {
            Expression::If(e) => self.if_expression(e),
            Expression::Try(e) => self.try_expression(e),
            Expression::For(e) => self.for_expression(e),
            Expression::While(e) => self.while_expression(e),
            Expression::Binary(e) => self.binary(e),
            Expression::Unary(e) => self.unary(e),
            Expression::TypeOp(e) => self.type_op(e),
            Expression::CallableReference(e) => self.callable_reference(e),
            Expression::ClassLiteral(e) => self.class_literal(e),
            Expression::Parenthesized(e) => self.parenthesized(e),
            Expression::StringTemplate(e) => self.string_template(e),
            Expression::Constant(e) => self.constant(e),
            Expression::Lambda(e) => self.lambda(e),
            Expression::This(e) => self.this(e),
            Expression::Super(e) => self.super_expression(e),
            Expression::When(e) => self.when(e),
            Expression::Object(e) => self.object(e),
            Expression::Throw(e) => self.throw(e),
            Expression::Return(e) => self.return_expression(e),
            Expression::Continue(e) => self.continue_expression(e),
            Expression::Break(e) => self.break_expression(e),
            Expression::CollectionLiteral(e) => self.collection_literal(e),
            Expression::Name(e) => self.name(e),
            Expression::Labeled(e) => self.labeled(e),
            Expression::Annotated(e) => self.annotated(e),
            Expression::Call(e) => self.call(e),
            Expression::ArrayAccess(e) => self.array_access(e),
            Expression::AnonymousFunction(e) => self.anonymous_function(e),
            Expression::Property(e) => self.property_expression(e),
            Expression::Block(e) => self.block(e),
        }
    }

    pub(super) fn name(&mut self, name: &'a Name) {
        self.node(&name.extras, |w| w.token(&name.text));
    }

    /// `@label` after a keyword, owned by the enclosing node
    fn label(&mut self, label: Option<&'a Name>) {
        if let Some(label) = label {
            self.token("@");
            self.name(label);
        }
    }

    /// Statements on their own lines, one level deeper
    fn statements(&mut self, statements: &'a [Statement]) {
        self.indented(|w| {
            for statement in statements {
                w.newline();
                w.statement(statement);
            }
        });
        if !statements.is_empty() {
            self.newline();
        }
    }

    pub(super) fn block(&mut self, block: &'a Block) {
        self.node(&block.extras, |w| {
            w.token("{");
            w.statements(&block.statements);
            w.token("}");
        });
    }

    // ==================
    // Control flow
    // ==================

    /// `( condition )` owned by the enclosing node
    fn condition(&mut self, condition: &'a Expression) {
        self.token("(");
        self.expression(condition);
        self.token(")");
    }

    pub(super) fn if_expression(&mut self, expression: &'a IfExpression) {
        self.node(&expression.extras, |w| {
            w.token("if");
            w.space();
            w.condition(&expression.condition);
            w.space();
            w.expression(&expression.body);
            if let Some(else_body) = &expression.else_body {
                w.space();
                w.token("else");
                w.space();
                w.expression(else_body);
            }
        });
    }

    pub(super) fn try_expression(&mut self, expression: &'a TryExpression) {
        self.node(&expression.extras, |w| {
            w.token("try");
            w.space();
            w.block(&expression.block);
            for catch in &expression.catches {
                w.space();
                w.catch_clause(catch);
            }
            if let Some(finally_block) = &expression.finally_block {
                w.space();
                w.token("finally");
                w.space();
                w.block(finally_block);
            }
        });
    }

    pub(super) fn catch_clause(&mut self, catch: &'a CatchClause) {
        self.node(&catch.extras, |w| {
            w.token("catch");
            w.space();
            w.comma_list(&catch.params, Self::function_param);
            w.space();
            w.block(&catch.block);
        });
    }

    pub(super) fn for_expression(&mut self, expression: &'a ForExpression) {
        self.node(&expression.extras, |w| {
            w.token("for");
            w.space();
            w.token("(");
            w.variable(&expression.variable);
            w.space();
            w.token("in");
            w.space();
            w.expression(&expression.iterable);
            w.token(")");
            w.space();
            w.expression(&expression.body);
        });
    }

    pub(super) fn while_expression(&mut self, expression: &'a WhileExpression) {
        self.node(&expression.extras, |w| {
            if expression.do_while {
                w.token("do");
                if let Some(body) = &expression.body {
                    w.space();
                    w.expression(body);
                }
                w.space();
                w.token("while");
                w.space();
                w.condition(&expression.condition);
            } else {
                w.token("while");
                w.space();
                w.condition(&expression.condition);
                match &expression.body {
                    Some(body) => {
                        w.space();
                        w.expression(body);
                    }
                    None => w.synthetic(";"),
                }
            }
        });
    }

    pub(super) fn when(&mut self, expression: &'a WhenExpression) {
        self.node(&expression.extras, |w| {
            w.token("when");
            if let Some(subject) = &expression.subject {
                w.space();
                w.when_subject(subject);
            }
            w.space();
            let entries = &expression.entries;
            w.node(&entries.extras, |w| {
                if let Some(prefix) = entries.prefix {
                    w.token(prefix);
                }
                w.indented(|w| {
                    for entry in entries {
                        w.newline();
                        w.when_entry(entry);
                    }
                });
                if !entries.is_empty() {
                    w.newline();
                }
                if let Some(suffix) = entries.suffix {
                    w.token(suffix);
                }
            });
        });
    }

    pub(super) fn when_subject(&mut self, subject: &'a WhenSubject) {
        self.node(&subject.extras, |w| w.condition(&subject.expression));
    }

    fn when_entry(&mut self, entry: &'a WhenEntry) {
        match entry {
            WhenEntry::Conditions(entry) => self.when_conditions_entry(entry),
            WhenEntry::Else(entry) => self.when_else_entry(entry),
        }
    }

    pub(super) fn when_conditions_entry(&mut self, entry: &'a WhenConditionsEntry) {
        self.node(&entry.extras, |w| {
            w.comma_list(&entry.conditions, Self::when_condition);
            w.space();
            w.token("->");
            w.space();
            w.expression(&entry.body);
        });
    }

    pub(super) fn when_else_entry(&mut self, entry: &'a WhenElseEntry) {
        self.node(&entry.extras, |w| {
            w.token("else");
            w.space();
            w.token("->");
            w.space();
            w.expression(&entry.body);
        });
    }

    fn when_condition(&mut self, condition: &'a WhenCondition) {
        match condition {
            WhenCondition::Expression(condition) => self.when_expression_condition(condition),
            WhenCondition::In(condition) => self.when_in_condition(condition),
            WhenCondition::Is(condition) => self.when_is_condition(condition),
        }
    }

    pub(super) fn when_expression_condition(&mut self, condition: &'a WhenExpressionCondition) {
        self.node(&condition.extras, |w| w.expression(&condition.expression));
    }

    pub(super) fn when_in_condition(&mut self, condition: &'a WhenInCondition) {
        self.node(&condition.extras, |w| {
            w.keyword(&condition.operator);
            w.space();
            w.expression(&condition.expression);
        });
    }

    pub(super) fn when_is_condition(&mut self, condition: &'a WhenIsCondition) {
        self.node(&condition.extras, |w| {
            w.keyword(&condition.operator);
            w.space();
            w.type_ref(&condition.type_ref);
        });
    }

    // ==================
    // Operators
    // ==================

    pub(super) fn binary(&mut self, expression: &'a BinaryExpression) {
        self.node(&expression.extras, |w| {
            w.expression(&expression.lhs);
            match &expression.operator {
                BinaryOperator::Token(keyword) if matches!(keyword.text(), "." | "?.") => {
                    w.keyword(keyword);
                }
                BinaryOperator::Token(keyword) => {
                    w.space();
                    w.keyword(keyword);
                    w.space();
                }
                BinaryOperator::Infix(name) => {
                    w.space();
                    w.name(name);
                    w.space();
                }
            }
            w.expression(&expression.rhs);
        });
    }

    pub(super) fn unary(&mut self, expression: &'a UnaryExpression) {
        self.node(&expression.extras, |w| {
            if expression.prefix {
                w.keyword(&expression.operator);
                w.expression(&expression.expression);
            } else {
                w.expression(&expression.expression);
                w.keyword(&expression.operator);
            }
        });
    }

    pub(super) fn type_op(&mut self, expression: &'a TypeOpExpression) {
        self.node(&expression.extras, |w| {
            w.expression(&expression.lhs);
            w.space();
            w.keyword(&expression.operator);
            w.space();
            w.type_ref(&expression.rhs);
        });
    }

    fn double_colon_receiver(&mut self, receiver: &'a DoubleColonReceiver) {
        match receiver {
            DoubleColonReceiver::Expression(expression) => self.expression(expression),
            DoubleColonReceiver::Type(type_ref) => self.type_ref(type_ref),
        }
    }

    pub(super) fn callable_reference(&mut self, expression: &'a CallableReferenceExpression) {
        self.node(&expression.extras, |w| {
            if let Some(receiver) = &expression.receiver {
                w.double_colon_receiver(receiver);
            }
            w.token("::");
            w.name(&expression.name);
        });
    }

    pub(super) fn class_literal(&mut self, expression: &'a ClassLiteralExpression) {
        self.node(&expression.extras, |w| {
            w.double_colon_receiver(&expression.receiver);
            w.token("::");
            w.token("class");
        });
    }

    pub(super) fn parenthesized(&mut self, expression: &'a ParenthesizedExpression) {
        self.node(&expression.extras, |w| w.condition(&expression.expression));
    }

    // ==================
    // Literals
    // ==================

    pub(super) fn constant(&mut self, constant: &'a ConstantExpression) {
        self.node(&constant.extras, |w| w.token(&constant.text));
    }

    pub(super) fn string_template(&mut self, template: &'a StringTemplate) {
        let quote = if template.raw { "\"\"\"" } else { "\"" };
        self.node(&template.extras, |w| {
            w.literal(quote);
            for entry in &template.entries {
                match entry {
                    StringEntry::Regular(entry) => w.regular_string_entry(entry),
                    StringEntry::ShortTemplate(entry) => w.short_template_entry(entry),
                    StringEntry::UnicodeEscape(entry) => w.unicode_escape_entry(entry),
                    StringEntry::RegularEscape(entry) => w.regular_escape_entry(entry),
                    StringEntry::LongTemplate(entry) => w.long_template_entry(entry),
                }
            }
            w.literal(quote);
        });
    }

    pub(super) fn regular_string_entry(&mut self, entry: &'a RegularStringEntry) {
        self.node(&entry.extras, |w| w.literal(&entry.text));
    }

    pub(super) fn short_template_entry(&mut self, entry: &'a ShortTemplateEntry) {
        self.node(&entry.extras, |w| {
            w.literal("$");
            w.literal(&entry.text);
        });
    }

    pub(super) fn unicode_escape_entry(&mut self, entry: &'a UnicodeEscapeEntry) {
        self.node(&entry.extras, |w| {
            w.literal(&format!("\\u{}", entry.digits));
        });
    }

    pub(super) fn regular_escape_entry(&mut self, entry: &'a RegularEscapeEntry) {
        self.node(&entry.extras, |w| {
            w.literal(&format!("\\{}", entry.character));
        });
    }

    pub(super) fn long_template_entry(&mut self, entry: &'a LongTemplateEntry) {
        self.node(&entry.extras, |w| {
            w.literal("${");
            w.expression(&entry.expression);
            w.literal("}");
        });
    }

    pub(super) fn collection_literal(&mut self, literal: &'a CollectionLiteralExpression) {
        self.node(&literal.extras, |w| {
            w.comma_list(&literal.expressions, Self::expression);
        });
    }

    // ==================
    // Lambdas
    // ==================

    /// One line when the body has at most one statement
    pub(super) fn lambda(&mut self, lambda: &'a LambdaExpression) {
        self.node(&lambda.extras, |w| {
            w.token("{");
            if let Some(params) = &lambda.params {
                w.space();
                w.comma_list(params, Self::variable);
                w.space();
                w.token("->");
            }
            w.lambda_body(&lambda.body);
            if lambda.body.statements.len() <= 1
                && (lambda.params.is_some() || !lambda.body.statements.is_empty())
            {
                w.space();
            }
            w.token("}");
        });
    }

    pub(super) fn lambda_body(&mut self, body: &'a LambdaBody) {
        self.node(&body.extras, |w| {
            if body.statements.len() <= 1 {
                for statement in &body.statements {
                    w.space();
                    w.statement(statement);
                }
            } else {
                w.statements(&body.statements);
            }
        });
    }

    pub(super) fn this(&mut self, expression: &'a ThisExpression) {
        self.node(&expression.extras, |w| {
            w.token("this");
            w.label(expression.label.as_ref());
        });
    }

    pub(super) fn super_expression(&mut self, expression: &'a SuperExpression) {
        self.node(&expression.extras, |w| {
            w.token("super");
            if let Some(type_arg) = &expression.type_arg {
                w.token("<");
                w.type_ref(type_arg);
                w.token(">");
            }
            w.label(expression.label.as_ref());
        });
    }

    // ==================
    // Jumps and wrappers
    // ==================

    pub(super) fn object(&mut self, expression: &'a ObjectExpression) {
        self.node(&expression.extras, |w| w.class(&expression.declaration));
    }

    pub(super) fn throw(&mut self, expression: &'a ThrowExpression) {
        self.node(&expression.extras, |w| {
            w.token("throw");
            w.space();
            w.expression(&expression.expression);
        });
    }

    pub(super) fn return_expression(&mut self, expression: &'a ReturnExpression) {
        self.node(&expression.extras, |w| {
            w.token("return");
            w.label(expression.label.as_ref());
            if let Some(value) = &expression.expression {
                w.space();
                w.expression(value);
            }
        });
    }

    pub(super) fn continue_expression(&mut self, expression: &'a ContinueExpression) {
        self.node(&expression.extras, |w| {
            w.token("continue");
            w.label(expression.label.as_ref());
        });
    }

    pub(super) fn break_expression(&mut self, expression: &'a BreakExpression) {
        self.node(&expression.extras, |w| {
            w.token("break");
            w.label(expression.label.as_ref());
        });
    }

    pub(super) fn labeled(&mut self, expression: &'a LabeledExpression) {
        self.node(&expression.extras, |w| {
            w.name(&expression.label);
            w.token("@");
            w.space();
            w.expression(&expression.expression);
        });
    }

    pub(super) fn annotated(&mut self, expression: &'a AnnotatedExpression) {
        self.node(&expression.extras, |w| {
            for set in &expression.annotation_sets {
                w.annotation_set(set);
                w.space();
            }
            w.expression(&expression.expression);
        });
    }

    pub(super) fn anonymous_function(&mut self, expression: &'a AnonymousFunctionExpression) {
        self.node(&expression.extras, |w| w.function(&expression.function));
    }

    pub(super) fn property_expression(&mut self, expression: &'a PropertyExpression) {
        self.node(&expression.extras, |w| w.property(&expression.declaration));
    }

    // ==================
    // Calls
    // ==================

    pub(super) fn call(&mut self, call: &'a CallExpression) {
        self.node(&call.extras, |w| {
            w.expression(&call.expression);
            if let Some(type_args) = &call.type_args {
                w.comma_list(type_args, Self::type_argument);
            }
            if let Some(args) = &call.args {
                w.comma_list(args, Self::value_argument);
            }
            if let Some(lambda_arg) = &call.lambda_arg {
                w.space();
                w.lambda_arg(lambda_arg);
            }
        });
    }

    pub(super) fn lambda_arg(&mut self, argument: &'a LambdaArg) {
        self.node(&argument.extras, |w| {
            for set in &argument.annotation_sets {
                w.annotation_set(set);
                w.space();
            }
            if let Some(label) = &argument.label {
                w.name(label);
                w.token("@");
            }
            w.lambda(&argument.lambda);
        });
    }

    pub(super) fn array_access(&mut self, expression: &'a ArrayAccessExpression) {
        self.node(&expression.extras, |w| {
            w.expression(&expression.expression);
            w.comma_list(&expression.indices, Self::expression);
        });
    }
}
