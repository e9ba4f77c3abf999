//! Expressions, from binary operators down to atoms

use super::{ModifierContext, Parser};
use crate::cst::KtSyntaxKind;

/// How a binary operator builds its node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryShape {
    Binary,
    /// `is` / `!is` with a type on the right
    Is,
    /// `as` / `as?` with a type on the right
    As,
}

impl Parser<'_> {
    pub(super) fn parse_expression(&mut self) {
        self.parse_binary(0);
    }

    /// Precedence and shape of the binary operator at the cursor
    fn binary_operator(&self) -> Option<(u8, BinaryShape)> {
        use KtSyntaxKind::*;

        let kind = self.current();
        // These may continue an expression on the next line
        let continues_line = matches!(kind, OrOr | AndAnd | Elvis);
        if !continues_line && self.newline_before() {
            return None;
        }

        let operator = match kind {
            OrOr => (1, BinaryShape::Binary),
            AndAnd => (2, BinaryShape::Binary),
            EqEq | ExclEq | EqEqEq | ExclEqEq => (3, BinaryShape::Binary),
            Lt | Gt | LtEq | GtEq => (4, BinaryShape::Binary),
            InKw | NotInKw => (5, BinaryShape::Binary),
            IsKw | NotIsKw => (5, BinaryShape::Is),
            Elvis => (6, BinaryShape::Binary),
            Ident if !self.at_label() => (7, BinaryShape::Binary),
            Range | RangeUntil => (8, BinaryShape::Binary),
            Plus | Minus => (9, BinaryShape::Binary),
            Star | Slash | Percent => (10, BinaryShape::Binary),
            AsKw | AsSafeKw => (11, BinaryShape::As),
            _ => return None,
        };
        Some(operator)
    }

    fn parse_binary(&mut self, min_precedence: u8) {
        let checkpoint = self.checkpoint();
        self.parse_prefix();

        while let Some((precedence, shape)) = self.binary_operator() {
            if precedence < min_precedence {
                break;
            }
            match shape {
                BinaryShape::Binary => {
                    self.start_node_at(checkpoint, KtSyntaxKind::BinaryExpression);
                    self.parse_operation_reference();
                    self.parse_binary(precedence + 1);
                }
                BinaryShape::Is => {
                    self.start_node_at(checkpoint, KtSyntaxKind::IsExpression);
                    self.parse_operation_reference();
                    self.parse_type_reference();
                }
                BinaryShape::As => {
                    self.start_node_at(checkpoint, KtSyntaxKind::BinaryWithType);
                    self.parse_operation_reference();
                    self.parse_type_reference();
                }
            }
            self.finish_node();
        }
    }

    pub(super) fn parse_operation_reference(&mut self) {
        self.start_node(KtSyntaxKind::OperationReference);
        self.bump();
        self.finish_node();
    }

    /// `name@` directly followed by its `@`
    fn at_label(&self) -> bool {
        self.at(KtSyntaxKind::Ident) && self.nth(1) == KtSyntaxKind::At && self.adjacent(1)
    }

    fn parse_prefix(&mut self) {
        use KtSyntaxKind::*;

        match self.current() {
            Minus | Plus | PlusPlus | MinusMinus | Excl => {
                self.start_node(PrefixExpression);
                self.parse_operation_reference();
                self.parse_prefix();
                self.finish_node();
            }
            At => {
                self.start_node(AnnotatedExpression);
                while self.at(At) {
                    self.parse_annotation_set(ModifierContext::Declaration);
                }
                self.parse_prefix();
                self.finish_node();
            }
            Ident if self.at_label() => {
                self.start_node(LabeledExpression);
                self.bump();
                self.bump();
                self.parse_prefix();
                self.finish_node();
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) {
        use KtSyntaxKind::*;

        let checkpoint = self.checkpoint();
        self.parse_atom();

        loop {
            match self.current() {
                PlusPlus | MinusMinus | ExclExcl if !self.newline_before() => {
                    self.start_node_at(checkpoint, PostfixExpression);
                    self.parse_operation_reference();
                    self.finish_node();
                }
                Dot | SafeDot => {
                    let kind = if self.at(Dot) {
                        DotQualifiedExpression
                    } else {
                        SafeAccessExpression
                    };
                    self.start_node_at(checkpoint, kind);
                    self.bump();
                    self.parse_selector();
                    self.finish_node();
                }
                ColonColon if !self.newline_before_raw() => {
                    let kind = if self.nth(1) == ClassKw {
                        ClassLiteralExpression
                    } else {
                        CallableReferenceExpression
                    };
                    self.start_node_at(checkpoint, kind);
                    self.bump();
                    if !self.eat(ClassKw) {
                        self.parse_reference();
                    }
                    self.finish_node();
                }
                LParen if !self.newline_before_raw() => {
                    self.start_node_at(checkpoint, CallExpression);
                    self.parse_value_argument_list();
                    self.parse_lambda_arguments();
                    self.finish_node();
                }
                Lt if !self.newline_before_raw() && self.call_type_arguments_ahead() => {
                    self.start_node_at(checkpoint, CallExpression);
                    self.parse_call_suffix();
                    self.finish_node();
                }
                LBracket if !self.newline_before_raw() => {
                    self.start_node_at(checkpoint, ArrayAccessExpression);
                    self.with_newlines_ignored(|p| {
                        p.start_node(Indices);
                        p.bump();
                        while !p.at(RBracket) && !p.at(Eof) {
                            p.parse_expression();
                            if !p.eat(Comma) {
                                break;
                            }
                        }
                        p.expect(RBracket);
                        p.finish_node();
                    });
                    self.finish_node();
                }
                _ if self.at_lambda_argument() => {
                    self.start_node_at(checkpoint, CallExpression);
                    self.parse_lambda_arguments();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    /// The name after `.` or `?.`, with its immediate call suffix
    fn parse_selector(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_reference();
        let has_call = !self.newline_before_raw()
            && (self.at(KtSyntaxKind::LParen)
                || (self.at(KtSyntaxKind::Lt) && self.call_type_arguments_ahead())
                || self.at_lambda_argument());
        if has_call {
            self.start_node_at(checkpoint, KtSyntaxKind::CallExpression);
            self.parse_call_suffix();
            self.finish_node();
        }
    }

    /// Type arguments, value arguments and trailing lambdas of a call
    fn parse_call_suffix(&mut self) {
        if self.at(KtSyntaxKind::Lt) {
            self.parse_type_argument_list();
        }
        if self.at(KtSyntaxKind::LParen) && !self.newline_before_raw() {
            self.parse_value_argument_list();
        }
        self.parse_lambda_arguments();
    }

    /// `<...>` followed by something only a call can continue with
    fn call_type_arguments_ahead(&self) -> bool {
        use KtSyntaxKind::*;

        let mut depth = 0usize;
        let mut parens = 0usize;
        let mut n = 0;
        loop {
            match self.nth(n) {
                Lt => depth += 1,
                Gt => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                LParen => parens += 1,
                RParen if parens > 0 => parens -= 1,
                Ident | Comma | Dot | Question | Star | InKw | Colon | Arrow | At => {}
                _ => return false,
            }
            n += 1;
        }
        parens == 0 && matches!(self.nth(n + 1), LParen | LBrace | ColonColon)
    }

    fn at_lambda_argument(&self) -> bool {
        if !self.trailing_lambdas || self.newline_before_raw() {
            return false;
        }
        match self.current() {
            KtSyntaxKind::LBrace => true,
            KtSyntaxKind::Ident => self.at_label() && self.nth(2) == KtSyntaxKind::LBrace,
            KtSyntaxKind::At => {
                let n = self.skip_modifiers(0, ModifierContext::Type);
                self.nth(n) == KtSyntaxKind::LBrace
                    || (self.nth(n) == KtSyntaxKind::Ident
                        && self.nth(n + 1) == KtSyntaxKind::At
                        && self.nth(n + 2) == KtSyntaxKind::LBrace)
            }
            _ => false,
        }
    }

    fn parse_lambda_arguments(&mut self) {
        while self.at_lambda_argument() {
            self.start_node(KtSyntaxKind::LambdaArgument);
            if self.at(KtSyntaxKind::At) {
                self.start_node(KtSyntaxKind::AnnotatedExpression);
                while self.at(KtSyntaxKind::At) {
                    self.parse_annotation_set(ModifierContext::Type);
                }
                self.parse_labeled_lambda();
                self.finish_node();
            } else {
                self.parse_labeled_lambda();
            }
            self.finish_node();
        }
    }

    fn parse_labeled_lambda(&mut self) {
        if self.at_label() {
            self.start_node(KtSyntaxKind::LabeledExpression);
            self.bump();
            self.bump();
            self.parse_lambda();
            self.finish_node();
        } else if self.at(KtSyntaxKind::LBrace) {
            self.parse_lambda();
        } else {
            self.error("Expected a lambda expression");
        }
    }

    pub(super) fn parse_value_argument_list(&mut self) {
        self.with_newlines_ignored(|p| {
            p.start_node(KtSyntaxKind::ValueArgumentList);
            p.bump();
            while !p.at(KtSyntaxKind::RParen) && !p.at(KtSyntaxKind::Eof) {
                p.start_node(KtSyntaxKind::ValueArgument);
                if p.at(KtSyntaxKind::Ident) && p.nth(1) == KtSyntaxKind::Eq {
                    p.bump();
                    p.bump();
                }
                p.eat(KtSyntaxKind::Star);
                p.parse_expression();
                p.finish_node();
                if !p.eat(KtSyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(KtSyntaxKind::RParen);
            p.finish_node();
        });
    }

    // ==================
    // Atoms
    // ==================

    fn can_start_expression(&self) -> bool {
        use KtSyntaxKind::*;
        matches!(
            self.current(),
            IntLiteral
                | FloatLiteral
                | CharLiteral
                | OpenQuote
                | Ident
                | LParen
                | LBracket
                | LBrace
                | ThisKw
                | SuperKw
                | IfKw
                | WhenKw
                | TryKw
                | ForKw
                | WhileKw
                | DoKw
                | ThrowKw
                | ReturnKw
                | ContinueKw
                | BreakKw
                | ObjectKw
                | FunKw
                | ColonColon
                | Minus
                | Plus
                | PlusPlus
                | MinusMinus
                | Excl
                | At
                | TrueKw
                | FalseKw
                | NullKw
        )
    }

    fn parse_atom(&mut self) {
        use KtSyntaxKind::*;

        match self.current() {
            IntLiteral => self.parse_leaf(IntegerConstant),
            FloatLiteral => self.parse_leaf(FloatConstant),
            CharLiteral => self.parse_leaf(CharacterConstant),
            TrueKw | FalseKw => self.parse_leaf(BooleanConstant),
            NullKw => self.parse_leaf(NullConstant),
            OpenQuote => self.parse_string_template(),
            LParen => {
                self.start_node(Parenthesized);
                self.with_newlines_ignored(|p| {
                    p.bump();
                    p.parse_expression();
                    p.expect(RParen);
                });
                self.finish_node();
            }
            LBracket => {
                self.start_node(CollectionLiteralExpression);
                self.with_newlines_ignored(|p| {
                    p.bump();
                    while !p.at(RBracket) && !p.at(Eof) {
                        p.parse_expression();
                        if !p.eat(Comma) {
                            break;
                        }
                    }
                    p.expect(RBracket);
                });
                self.finish_node();
            }
            LBrace => self.parse_lambda(),
            ThisKw => {
                self.start_node(ThisExpression);
                self.bump();
                self.parse_label_qualifier();
                self.finish_node();
            }
            SuperKw => {
                self.start_node(SuperExpression);
                self.bump();
                if self.at_adjacent(Lt) {
                    self.bump();
                    self.parse_type_reference();
                    self.expect(Gt);
                }
                self.parse_label_qualifier();
                self.finish_node();
            }
            IfKw => self.parse_if(),
            WhenKw => self.parse_when(),
            TryKw => self.parse_try(),
            ForKw => self.parse_for(),
            WhileKw => self.parse_while(),
            DoKw => self.parse_do_while(),
            ThrowKw => {
                self.start_node(Throw);
                self.bump();
                self.parse_expression();
                self.finish_node();
            }
            ReturnKw => {
                self.start_node(Return);
                self.bump();
                self.parse_label_qualifier();
                if !self.newline_before() && self.can_start_expression() {
                    self.parse_expression();
                }
                self.finish_node();
            }
            ContinueKw | BreakKw => {
                let kind = if self.at(ContinueKw) { Continue } else { Break };
                self.start_node(kind);
                self.bump();
                self.parse_label_qualifier();
                self.finish_node();
            }
            ObjectKw => {
                self.start_node(ObjectLiteral);
                let checkpoint = self.checkpoint();
                self.parse_object_declaration(checkpoint);
                self.finish_node();
            }
            FunKw => {
                self.start_node(AnonymousFunction);
                let checkpoint = self.checkpoint();
                self.parse_function(checkpoint);
                self.finish_node();
            }
            ColonColon => {
                self.start_node(CallableReferenceExpression);
                self.bump();
                self.parse_reference();
                self.finish_node();
            }
            Ident if self.type_receiver_ahead() => self.parse_type_reference(),
            Ident => self.parse_reference(),
            RParen | RBracket | RBrace | Semicolon | Comma | Eof => {
                self.error("Expecting an expression");
            }
            _ => self.error_bump("Expecting an expression"),
        }
    }

    fn parse_leaf(&mut self, kind: KtSyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// `@label` glued to the preceding keyword
    fn parse_label_qualifier(&mut self) {
        if self.at_adjacent(KtSyntaxKind::At) && self.nth(1) == KtSyntaxKind::Ident && self.adjacent(1) {
            self.start_node(KtSyntaxKind::LabelQualifier);
            self.bump();
            self.bump();
            self.finish_node();
        }
    }

    /// `Foo<Bar>::class` or `Foo?::bar`: a type on the left of `::`
    fn type_receiver_ahead(&self) -> bool {
        use KtSyntaxKind::*;

        let mut n = 0;
        let mut type_only = false;
        loop {
            if self.nth(n) != Ident {
                return false;
            }
            n += 1;
            if self.nth(n) == Lt {
                type_only = true;
                n = self.skip_balanced(n, Lt, Gt);
            }
            if self.nth(n) == Dot && self.nth(n + 1) == Ident {
                n += 1;
            } else {
                break;
            }
        }
        while self.nth(n) == Question {
            type_only = true;
            n += 1;
        }
        type_only && self.nth(n) == ColonColon
    }

    fn parse_string_template(&mut self) {
        use KtSyntaxKind::*;

        self.start_node(StringTemplate);
        self.bump();
        loop {
            match self.current() {
                RegularStringPart => self.parse_leaf(LiteralStringTemplateEntry),
                EscapeSequence => self.parse_leaf(EscapeStringTemplateEntry),
                ShortTemplateEntryStart => {
                    self.start_node(ShortStringTemplateEntry);
                    self.bump();
                    self.bump();
                    self.finish_node();
                }
                LongTemplateEntryStart => {
                    self.start_node(LongStringTemplateEntry);
                    self.with_newlines_ignored(|p| {
                        p.bump();
                        p.parse_expression();
                    });
                    self.expect(LongTemplateEntryEnd);
                    self.finish_node();
                }
                ClosingQuote => {
                    self.bump();
                    break;
                }
                _ => {
                    self.error("Unterminated string template");
                    break;
                }
            }
        }
        self.finish_node();
    }

    pub(super) fn parse_block(&mut self) {
        self.with_newlines_significant(|p| {
            p.start_node(KtSyntaxKind::Block);
            p.bump();
            p.parse_statements_until(KtSyntaxKind::RBrace);
            p.expect(KtSyntaxKind::RBrace);
            p.finish_node();
        });
    }

    fn parse_lambda(&mut self) {
        self.with_newlines_significant(|p| {
            p.start_node(KtSyntaxKind::LambdaExpression);
            p.bump();
            if p.lambda_parameters_ahead() {
                p.start_node(KtSyntaxKind::LambdaParameterList);
                while !p.at(KtSyntaxKind::Arrow) && !p.at(KtSyntaxKind::Eof) {
                    if p.at(KtSyntaxKind::LParen) {
                        p.parse_destructuring_declaration();
                    } else {
                        p.parse_value_parameter();
                    }
                    if !p.eat(KtSyntaxKind::Comma) {
                        break;
                    }
                }
                p.finish_node();
                p.expect(KtSyntaxKind::Arrow);
            }
            p.start_node(KtSyntaxKind::LambdaBody);
            p.parse_statements_until(KtSyntaxKind::RBrace);
            p.finish_node();
            p.expect(KtSyntaxKind::RBrace);
            p.finish_node();
        });
    }

    /// Is there a parameter list ending in `->` right after `{`
    fn lambda_parameters_ahead(&self) -> bool {
        use KtSyntaxKind::*;

        let mut depth = 0usize;
        let mut n = 0;
        loop {
            match self.nth(n) {
                Arrow if depth == 0 => return true,
                LParen | Lt => depth += 1,
                RParen | Gt => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                Ident | Colon | Comma | Dot | Question | Star | Arrow | At => {}
                _ => return false,
            }
            n += 1;
        }
    }

    /// Body of `if`, `when` entries and loops: a block or a statement
    fn parse_control_body(&mut self) {
        if self.at(KtSyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.parse_expression_statement();
        }
    }

    /// `;`, `}` or the end of input where a control body may go
    fn at_empty_body(&self) -> bool {
        matches!(
            self.current(),
            KtSyntaxKind::Semicolon | KtSyntaxKind::RBrace | KtSyntaxKind::Eof
        )
    }

    fn parse_parenthesized_condition(&mut self) {
        self.with_newlines_ignored(|p| {
            p.expect(KtSyntaxKind::LParen);
            p.parse_expression();
            p.expect(KtSyntaxKind::RParen);
        });
    }

    fn parse_if(&mut self) {
        self.start_node(KtSyntaxKind::If);
        self.bump();
        self.parse_parenthesized_condition();
        if !self.at_empty_body() && !self.at(KtSyntaxKind::ElseKw) {
            self.parse_control_body();
        }
        if self.at(KtSyntaxKind::Semicolon) && self.nth(1) == KtSyntaxKind::ElseKw {
            self.bump();
        }
        if self.eat(KtSyntaxKind::ElseKw) && !self.at_empty_body() {
            self.parse_control_body();
        }
        self.finish_node();
    }

    fn parse_when(&mut self) {
        use KtSyntaxKind::*;

        self.start_node(When);
        self.bump();
        if self.at(LParen) {
            self.with_newlines_ignored(|p| {
                p.bump();
                let n = p.skip_modifiers(0, ModifierContext::Declaration);
                if matches!(p.nth(n), ValKw | VarKw) {
                    let checkpoint = p.checkpoint();
                    p.parse_modifier_list(ModifierContext::Declaration);
                    p.parse_property(checkpoint, false);
                } else {
                    p.parse_expression();
                }
                p.expect(RParen);
            });
        }

        self.with_newlines_significant(|p| {
            p.expect(LBrace);
            loop {
                while p.eat(Semicolon) {}
                if p.at(RBrace) || p.at(Eof) {
                    break;
                }
                let start = p.pos;
                p.parse_when_entry();
                if p.pos == start {
                    p.error_bump("Expecting 'when' entry");
                }
            }
            p.expect(RBrace);
        });
        self.finish_node();
    }

    fn parse_when_entry(&mut self) {
        use KtSyntaxKind::*;

        self.start_node(WhenEntry);
        if !self.eat(ElseKw) {
            loop {
                self.parse_when_condition();
                if !self.eat(Comma) || self.at(Arrow) {
                    break;
                }
            }
        }
        self.expect(Arrow);
        self.parse_control_body();
        self.finish_node();
    }

    fn parse_when_condition(&mut self) {
        use KtSyntaxKind::*;

        match self.current() {
            InKw | NotInKw => {
                self.start_node(WhenConditionInRange);
                self.bump();
                self.parse_expression();
            }
            IsKw | NotIsKw => {
                self.start_node(WhenConditionIsPattern);
                self.bump();
                self.parse_type_reference();
            }
            _ => {
                self.start_node(WhenConditionExpression);
                self.parse_expression();
            }
        }
        self.finish_node();
    }

    fn parse_try(&mut self) {
        self.start_node(KtSyntaxKind::Try);
        self.bump();
        self.parse_required_block();
        while self.at_ident("catch") && self.nth(1) == KtSyntaxKind::LParen {
            self.start_node(KtSyntaxKind::Catch);
            self.bump_as(KtSyntaxKind::SoftKw);
            self.parse_value_parameter_list();
            self.parse_required_block();
            self.finish_node();
        }
        if self.at_ident("finally") && self.nth(1) == KtSyntaxKind::LBrace {
            self.start_node(KtSyntaxKind::Finally);
            self.bump_as(KtSyntaxKind::SoftKw);
            self.parse_block();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_required_block(&mut self) {
        if self.at(KtSyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.error("Expected a block");
        }
    }

    fn parse_for(&mut self) {
        use KtSyntaxKind::*;

        self.start_node(For);
        self.bump();
        self.with_newlines_ignored(|p| {
            p.expect(LParen);
            if p.at(LParen) {
                p.parse_destructuring_declaration();
            } else {
                p.parse_value_parameter();
            }
            p.expect(InKw);
            p.parse_expression();
            p.expect(RParen);
        });
        if !self.at_empty_body() {
            self.parse_control_body();
        }
        self.finish_node();
    }

    fn parse_while(&mut self) {
        self.start_node(KtSyntaxKind::While);
        self.bump();
        self.parse_parenthesized_condition();
        if !self.at_empty_body() {
            self.parse_control_body();
        }
        self.finish_node();
    }

    fn parse_do_while(&mut self) {
        self.start_node(KtSyntaxKind::DoWhile);
        self.bump();
        if !self.at(KtSyntaxKind::WhileKw) {
            self.parse_control_body();
        }
        self.expect(KtSyntaxKind::WhileKw);
        self.parse_parenthesized_condition();
        self.finish_node();
    }
}
