//! Declarations, modifiers and annotations

use rowan::Checkpoint;

use super::{DECLARATION_MODIFIERS, ModifierContext, Parser, USE_SITE_TARGETS};
use crate::cst::KtSyntaxKind;

impl<'t> Parser<'t> {
    // ==================
    // Modifiers
    // ==================

    /// Is the `n`-th token a modifier in this context
    fn is_modifier_at(&self, n: usize, context: ModifierContext) -> bool {
        let kind = self.nth(n);
        if kind == KtSyntaxKind::At {
            return context != ModifierContext::Variance || self.nth(n + 1) == KtSyntaxKind::Ident;
        }
        let follows = self.nth(n + 1);
        match context {
            ModifierContext::Declaration => {
                if kind == KtSyntaxKind::FunKw {
                    return follows == KtSyntaxKind::InterfaceKw;
                }
                kind == KtSyntaxKind::Ident
                    && DECLARATION_MODIFIERS.contains(&self.nth_text(n))
                    && matches!(
                        follows,
                        KtSyntaxKind::Ident
                            | KtSyntaxKind::At
                            | KtSyntaxKind::ValKw
                            | KtSyntaxKind::VarKw
                            | KtSyntaxKind::FunKw
                            | KtSyntaxKind::ClassKw
                            | KtSyntaxKind::InterfaceKw
                            | KtSyntaxKind::ObjectKw
                            | KtSyntaxKind::TypealiasKw
                            | KtSyntaxKind::PackageKw
                    )
            }
            ModifierContext::Type => {
                kind == KtSyntaxKind::Ident
                    && self.nth_text(n) == "suspend"
                    && matches!(follows, KtSyntaxKind::LParen | KtSyntaxKind::Ident)
            }
            ModifierContext::Variance => {
                let word = kind == KtSyntaxKind::InKw
                    || (kind == KtSyntaxKind::Ident
                        && matches!(self.nth_text(n), "out" | "reified"));
                word && matches!(
                    follows,
                    KtSyntaxKind::Ident | KtSyntaxKind::LParen | KtSyntaxKind::At
                )
            }
        }
    }

    /// Significant offset after the modifiers starting at offset `n`
    pub(super) fn skip_modifiers(&self, mut n: usize, context: ModifierContext) -> usize {
        while self.is_modifier_at(n, context) {
            if self.nth(n) == KtSyntaxKind::At {
                n = self.skip_annotation(n, context);
            } else {
                n += 1;
            }
        }
        n
    }

    /// Significant offset after the annotation starting at offset `n`
    fn skip_annotation(&self, n: usize, context: ModifierContext) -> usize {
        let mut n = n + 1;
        if self.nth(n) == KtSyntaxKind::Ident
            && USE_SITE_TARGETS.contains(&self.nth_text(n))
            && self.nth(n + 1) == KtSyntaxKind::Colon
        {
            n += 2;
        }
        if self.nth(n) == KtSyntaxKind::LBracket {
            return self.skip_balanced(n, KtSyntaxKind::LBracket, KtSyntaxKind::RBracket);
        }
        while self.nth(n) == KtSyntaxKind::Ident {
            n += 1;
            if self.nth(n) == KtSyntaxKind::Dot && self.nth(n + 1) == KtSyntaxKind::Ident {
                n += 1;
            } else {
                break;
            }
        }
        if self.nth(n) == KtSyntaxKind::Lt {
            n = self.skip_balanced(n, KtSyntaxKind::Lt, KtSyntaxKind::Gt);
        }
        if self.nth(n) == KtSyntaxKind::LParen && self.arguments_follow(n, context) {
            n = self.skip_balanced(n, KtSyntaxKind::LParen, KtSyntaxKind::RParen);
        }
        n
    }

    /// Does the `(` at offset `n` open the arguments of the annotation before it
    ///
    /// In a type, `@A (Int)` annotates a parenthesized type: arguments must be adjacent.
    fn arguments_follow(&self, n: usize, context: ModifierContext) -> bool {
        let index = self.nth_index(n);
        match context {
            ModifierContext::Type => !self.tokens[..index]
                .last()
                .is_some_and(|token| token.kind.is_trivia()),
            _ => !self.newline_before_index(index),
        }
    }

    /// Offset just past the bracket closing the one at offset `n`
    pub(super) fn skip_balanced(&self, mut n: usize, open: KtSyntaxKind, close: KtSyntaxKind) -> usize {
        let mut depth = 0usize;
        loop {
            let kind = self.nth(n);
            if kind == KtSyntaxKind::Eof {
                return n;
            }
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return n + 1;
                }
            }
            n += 1;
        }
    }

    /// Parse a modifier list if one starts here; returns the modifier words
    pub(super) fn parse_modifier_list(&mut self, context: ModifierContext) -> Vec<&'t str> {
        let mut words = Vec::new();
        if !self.is_modifier_at(0, context) {
            return words;
        }

        self.start_node(KtSyntaxKind::ModifierList);
        while self.is_modifier_at(0, context) {
            match self.current() {
                KtSyntaxKind::At => self.parse_annotation_set(context),
                KtSyntaxKind::Ident => {
                    words.push(self.nth_text(0));
                    self.bump_as(KtSyntaxKind::SoftKw);
                }
                _ => {
                    words.push(self.nth_text(0));
                    self.bump();
                }
            }
        }
        self.finish_node();
        words
    }

    /// `@Foo`, `@Foo(1)`, `@get:Foo`, `@[Foo Bar]`
    pub(super) fn parse_annotation_set(&mut self, context: ModifierContext) {
        self.start_node(KtSyntaxKind::AnnotationSet);
        self.bump();
        if self.at(KtSyntaxKind::Ident)
            && USE_SITE_TARGETS.contains(&self.nth_text(0))
            && self.nth(1) == KtSyntaxKind::Colon
        {
            self.bump_as(KtSyntaxKind::SoftKw);
            self.bump();
        }

        if self.at(KtSyntaxKind::LBracket) {
            self.bump();
            while self.at(KtSyntaxKind::Ident) {
                self.parse_annotation_entry(context);
            }
            self.expect(KtSyntaxKind::RBracket);
        } else {
            self.parse_annotation_entry(context);
        }
        self.finish_node();
    }

    fn parse_annotation_entry(&mut self, context: ModifierContext) {
        self.start_node(KtSyntaxKind::AnnotationEntry);
        self.start_node(KtSyntaxKind::ConstructorCallee);
        self.start_node(KtSyntaxKind::TypeReference);
        self.parse_user_type();
        self.finish_node();
        self.finish_node();
        if self.at(KtSyntaxKind::LParen) && self.arguments_follow(0, context) {
            self.parse_value_argument_list();
        }
        self.finish_node();
    }

    // ==================
    // Declarations
    // ==================

    /// Does a declaration start here (after any modifiers)
    ///
    /// In statement position `fun (` and `object :` start expressions.
    pub(super) fn at_declaration_start(&self, statement: bool) -> bool {
        let n = self.skip_modifiers(0, ModifierContext::Declaration);
        match self.nth(n) {
            KtSyntaxKind::ClassKw
            | KtSyntaxKind::InterfaceKw
            | KtSyntaxKind::ValKw
            | KtSyntaxKind::VarKw
            | KtSyntaxKind::TypealiasKw => true,
            KtSyntaxKind::FunKw => !statement || self.nth(n + 1) != KtSyntaxKind::LParen,
            KtSyntaxKind::ObjectKw => !statement || self.nth(n + 1) == KtSyntaxKind::Ident,
            _ => false,
        }
    }

    /// Parse a declaration; `member` enables property accessors
    pub(super) fn parse_declaration(&mut self, member: bool) {
        let checkpoint = self.checkpoint();
        let modifiers = self.parse_modifier_list(ModifierContext::Declaration);
        let is_enum = modifiers.contains(&"enum");

        match self.current() {
            KtSyntaxKind::ClassKw | KtSyntaxKind::InterfaceKw => self.parse_class(checkpoint, is_enum),
            KtSyntaxKind::ObjectKw => self.parse_object_declaration(checkpoint),
            KtSyntaxKind::FunKw => self.parse_function(checkpoint),
            KtSyntaxKind::ValKw | KtSyntaxKind::VarKw => self.parse_property(checkpoint, member),
            KtSyntaxKind::TypealiasKw => self.parse_typealias(checkpoint),
            KtSyntaxKind::Ident if member && self.at_ident("init") => {
                self.start_node_at(checkpoint, KtSyntaxKind::ClassInitializer);
                self.bump_as(KtSyntaxKind::SoftKw);
                self.parse_block();
                self.finish_node();
            }
            KtSyntaxKind::Ident if member && self.at_ident("constructor") => {
                self.parse_secondary_constructor(checkpoint);
            }
            _ => {
                self.start_node_at(checkpoint, KtSyntaxKind::Error);
                self.error("Expecting a declaration");
                self.finish_node();
            }
        }
    }

    fn parse_class(&mut self, checkpoint: Checkpoint, is_enum: bool) {
        self.start_node_at(checkpoint, KtSyntaxKind::Class);
        self.bump();
        if !self.eat(KtSyntaxKind::Ident) {
            self.error("Expected a class name");
        }
        if self.at(KtSyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.parse_primary_constructor();
        if self.at(KtSyntaxKind::Colon) {
            self.parse_super_type_list();
        }
        if self.at_ident("where") {
            self.parse_type_constraint_list();
        }
        if self.at(KtSyntaxKind::LBrace) {
            self.parse_class_body(is_enum);
        }
        self.finish_node();
    }

    fn parse_primary_constructor(&mut self) {
        if self.at(KtSyntaxKind::LParen) && !self.newline_before() {
            self.start_node(KtSyntaxKind::PrimaryConstructor);
            self.parse_value_parameter_list();
            self.finish_node();
            return;
        }

        let n = self.skip_modifiers(0, ModifierContext::Declaration);
        if self.nth_is_ident(n, "constructor") && self.nth(n + 1) == KtSyntaxKind::LParen {
            self.start_node(KtSyntaxKind::PrimaryConstructor);
            self.parse_modifier_list(ModifierContext::Declaration);
            self.bump_as(KtSyntaxKind::SoftKw);
            self.parse_value_parameter_list();
            self.finish_node();
        }
    }

    fn parse_super_type_list(&mut self) {
        self.start_node(KtSyntaxKind::SuperTypeList);
        self.bump();
        loop {
            self.parse_super_type_entry();
            if !self.eat(KtSyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_super_type_entry(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_type_reference();

        if self.at(KtSyntaxKind::LParen) && !self.newline_before() {
            self.start_node_at(checkpoint, KtSyntaxKind::SuperTypeCallEntry);
            self.start_node_at(checkpoint, KtSyntaxKind::ConstructorCallee);
            self.finish_node();
            self.parse_value_argument_list();
            self.finish_node();
        } else if self.at_ident("by") {
            self.start_node_at(checkpoint, KtSyntaxKind::DelegatedSuperTypeEntry);
            self.bump_as(KtSyntaxKind::SoftKw);
            let saved = std::mem::replace(&mut self.trailing_lambdas, false);
            self.parse_expression();
            self.trailing_lambdas = saved;
            self.finish_node();
        } else {
            self.start_node_at(checkpoint, KtSyntaxKind::SuperTypeEntry);
            self.finish_node();
        }
    }

    pub(super) fn parse_class_body(&mut self, is_enum: bool) {
        self.with_newlines_significant(|p| {
            p.start_node(KtSyntaxKind::ClassBody);
            p.bump();
            if is_enum {
                p.parse_enum_entries();
            }
            loop {
                while p.eat(KtSyntaxKind::Semicolon) {}
                if p.at(KtSyntaxKind::RBrace) || p.at(KtSyntaxKind::Eof) {
                    break;
                }
                let start = p.pos;
                p.parse_declaration(true);
                if p.pos == start {
                    p.error_bump("Expecting member declaration");
                }
            }
            p.expect(KtSyntaxKind::RBrace);
            p.finish_node();
        });
    }

    fn parse_enum_entries(&mut self) {
        loop {
            let n = self.skip_modifiers(0, ModifierContext::Declaration);
            if self.nth(n) != KtSyntaxKind::Ident || self.at_declaration_start(false) {
                break;
            }
            if self.nth_is_ident(n, "init") || self.nth_is_ident(n, "constructor") {
                break;
            }

            self.start_node(KtSyntaxKind::EnumEntry);
            self.parse_modifier_list(ModifierContext::Declaration);
            self.bump();
            if self.at(KtSyntaxKind::LParen) && !self.newline_before() {
                self.parse_value_argument_list();
            }
            if self.at(KtSyntaxKind::LBrace) {
                self.parse_class_body(false);
            }
            self.finish_node();

            if !self.eat(KtSyntaxKind::Comma) {
                break;
            }
        }
        self.eat(KtSyntaxKind::Semicolon);
    }

    fn parse_secondary_constructor(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, KtSyntaxKind::SecondaryConstructor);
        self.bump_as(KtSyntaxKind::SoftKw);
        self.parse_value_parameter_list();
        if self.at(KtSyntaxKind::Colon) {
            self.bump();
            self.start_node(KtSyntaxKind::ConstructorDelegationCall);
            if !(self.eat(KtSyntaxKind::ThisKw) || self.eat(KtSyntaxKind::SuperKw)) {
                self.error("Expected 'this' or 'super'");
            }
            if self.at(KtSyntaxKind::LParen) {
                self.parse_value_argument_list();
            } else {
                self.error("Expected an argument list");
            }
            self.finish_node();
        }
        if self.at(KtSyntaxKind::LBrace) {
            self.parse_block();
        }
        self.finish_node();
    }

    /// `object Name : Super { ... }`; also used for object literals
    pub(super) fn parse_object_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, KtSyntaxKind::ObjectDeclaration);
        self.bump();
        if self.at(KtSyntaxKind::Ident) {
            self.bump();
        }
        if self.at(KtSyntaxKind::Colon) {
            self.parse_super_type_list();
        }
        if self.at(KtSyntaxKind::LBrace) {
            self.parse_class_body(false);
        }
        self.finish_node();
    }

    /// Named functions and anonymous functions
    pub(super) fn parse_function(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, KtSyntaxKind::Fun);
        self.bump();
        if self.at(KtSyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.parse_receiver(false);
        if self.at(KtSyntaxKind::Ident) {
            self.bump();
        }
        if self.at(KtSyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        if self.at(KtSyntaxKind::LParen) {
            self.parse_value_parameter_list();
        } else {
            self.error("Expected a parameter list");
        }
        if self.at(KtSyntaxKind::Colon) {
            self.bump();
            self.parse_type_reference();
        }
        self.parse_post_modifiers();

        if self.at(KtSyntaxKind::LBrace) {
            self.parse_block();
        } else if self.at(KtSyntaxKind::Eq) {
            self.bump();
            self.parse_expression();
        }
        self.finish_node();
    }

    fn parse_post_modifiers(&mut self) {
        loop {
            if self.at_ident("where") {
                self.parse_type_constraint_list();
            } else if self.at_ident("contract") && self.nth(1) == KtSyntaxKind::LBracket {
                self.parse_contract();
            } else {
                break;
            }
        }
    }

    /// Receiver type of an extension declaration, up to its last `.`
    fn parse_receiver(&mut self, property: bool) {
        let Some(dot) = self.receiver_dot_ahead(property) else {
            return;
        };
        let saved = self.receiver_dot.replace(dot);
        self.parse_type_reference();
        self.receiver_dot = saved;
        self.expect(KtSyntaxKind::Dot);
    }

    /// Raw index of the `.` separating a receiver type from the name
    fn receiver_dot_ahead(&self, property: bool) -> Option<usize> {
        let mut depth = 0usize;
        let mut last_dot = None;
        let mut previous = KtSyntaxKind::Eof;
        let mut n = 0;
        loop {
            let kind = self.nth(n);
            let index = self.nth_index(n);
            if depth == 0 && n > 0 && self.newline_before_index(index) {
                break;
            }
            match kind {
                KtSyntaxKind::LParen if depth == 0 && previous == KtSyntaxKind::Ident => break,
                KtSyntaxKind::LParen | KtSyntaxKind::Lt | KtSyntaxKind::LBracket => depth += 1,
                KtSyntaxKind::RParen | KtSyntaxKind::Gt | KtSyntaxKind::RBracket => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                KtSyntaxKind::Dot if depth == 0 => last_dot = Some(index),
                KtSyntaxKind::Colon | KtSyntaxKind::Eq if depth == 0 => break,
                KtSyntaxKind::Ident if depth == 0 && property && self.nth_text(n) == "by" => break,
                KtSyntaxKind::LBrace
                | KtSyntaxKind::RBrace
                | KtSyntaxKind::Semicolon
                | KtSyntaxKind::Eof => break,
                _ => {}
            }
            previous = kind;
            n += 1;
        }
        last_dot
    }

    /// `val`/`var` declarations; `member` enables accessors
    pub(super) fn parse_property(&mut self, checkpoint: Checkpoint, member: bool) {
        self.start_node_at(checkpoint, KtSyntaxKind::Property);
        self.bump();
        if self.at(KtSyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.parse_receiver(true);

        if self.at(KtSyntaxKind::LParen) {
            self.parse_destructuring_declaration();
        } else {
            self.expect(KtSyntaxKind::Ident);
            if self.at(KtSyntaxKind::Colon) {
                self.bump();
                self.parse_type_reference();
            }
        }
        if self.at_ident("where") {
            self.parse_type_constraint_list();
        }

        if self.at(KtSyntaxKind::Eq) {
            self.bump();
            self.parse_expression();
        } else if self.at_ident("by") {
            self.start_node(KtSyntaxKind::PropertyDelegate);
            self.bump_as(KtSyntaxKind::SoftKw);
            self.parse_expression();
            self.finish_node();
        }

        if member {
            while self.at_accessor() {
                self.parse_accessor();
            }
        }
        self.finish_node();
    }

    fn at_accessor(&self) -> bool {
        let mut n = 0;
        if self.at(KtSyntaxKind::Semicolon) && !self.newline_before_raw() {
            n = 1;
        }
        let n = self.skip_modifiers(n, ModifierContext::Declaration);
        (self.nth_is_ident(n, "get") || self.nth_is_ident(n, "set"))
            && (matches!(
                self.nth(n + 1),
                KtSyntaxKind::LParen
                    | KtSyntaxKind::Eq
                    | KtSyntaxKind::LBrace
                    | KtSyntaxKind::Colon
                    | KtSyntaxKind::Semicolon
                    | KtSyntaxKind::RBrace
                    | KtSyntaxKind::Eof
            ) || self.newline_before_index(self.nth_index(n + 1)))
    }

    fn parse_accessor(&mut self) {
        self.eat(KtSyntaxKind::Semicolon);
        self.start_node(KtSyntaxKind::PropertyAccessor);
        self.parse_modifier_list(ModifierContext::Declaration);
        self.bump_as(KtSyntaxKind::SoftKw);
        if self.at(KtSyntaxKind::LParen) {
            self.parse_value_parameter_list();
        }
        if self.at(KtSyntaxKind::Colon) {
            self.bump();
            self.parse_type_reference();
        }
        if self.at(KtSyntaxKind::LBrace) {
            self.parse_block();
        } else if self.at(KtSyntaxKind::Eq) {
            self.bump();
            self.parse_expression();
        }
        self.finish_node();
    }

    /// `(a, b: T)` for destructuring properties, loops and lambdas
    pub(super) fn parse_destructuring_declaration(&mut self) {
        self.start_node(KtSyntaxKind::DestructuringDeclaration);
        self.with_newlines_ignored(|p| {
            p.bump();
            while p.at(KtSyntaxKind::Ident) {
                p.start_node(KtSyntaxKind::DestructuringDeclarationEntry);
                p.bump();
                if p.at(KtSyntaxKind::Colon) {
                    p.bump();
                    p.parse_type_reference();
                }
                p.finish_node();
                if !p.eat(KtSyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(KtSyntaxKind::RParen);
        });
        if self.at(KtSyntaxKind::Colon) {
            self.bump();
            self.parse_type_reference();
        }
        self.finish_node();
    }

    fn parse_typealias(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, KtSyntaxKind::Typealias);
        self.bump();
        self.expect(KtSyntaxKind::Ident);
        if self.at(KtSyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        self.expect(KtSyntaxKind::Eq);
        self.parse_type_reference();
        self.finish_node();
    }

    // ==================
    // Parameters
    // ==================

    pub(super) fn parse_value_parameter_list(&mut self) {
        self.with_newlines_ignored(|p| {
            p.start_node(KtSyntaxKind::ValueParameterList);
            p.bump();
            while !p.at(KtSyntaxKind::RParen) && !p.at(KtSyntaxKind::Eof) {
                let start = p.pos;
                p.parse_value_parameter();
                if p.pos == start {
                    p.error_bump("Expecting a parameter declaration");
                    continue;
                }
                if !p.eat(KtSyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(KtSyntaxKind::RParen);
            p.finish_node();
        });
    }

    pub(super) fn parse_value_parameter(&mut self) {
        let n = self.skip_modifiers(0, ModifierContext::Declaration);
        if !matches!(
            self.nth(n),
            KtSyntaxKind::Ident | KtSyntaxKind::ValKw | KtSyntaxKind::VarKw
        ) {
            return;
        }

        self.start_node(KtSyntaxKind::ValueParameter);
        self.parse_modifier_list(ModifierContext::Declaration);
        if !self.eat(KtSyntaxKind::ValKw) {
            self.eat(KtSyntaxKind::VarKw);
        }
        self.expect(KtSyntaxKind::Ident);
        if self.at(KtSyntaxKind::Colon) {
            self.bump();
            self.parse_type_reference();
        }
        if self.at(KtSyntaxKind::Eq) {
            self.bump();
            self.parse_expression();
        }
        self.finish_node();
    }

    pub(super) fn parse_type_parameter_list(&mut self) {
        self.with_newlines_ignored(|p| {
            p.start_node(KtSyntaxKind::TypeParameterList);
            p.bump();
            loop {
                p.start_node(KtSyntaxKind::TypeParameter);
                p.parse_modifier_list(ModifierContext::Variance);
                p.expect(KtSyntaxKind::Ident);
                if p.at(KtSyntaxKind::Colon) {
                    p.bump();
                    p.parse_type_reference();
                }
                p.finish_node();
                if !p.eat(KtSyntaxKind::Comma) || p.at(KtSyntaxKind::Gt) {
                    break;
                }
            }
            p.expect(KtSyntaxKind::Gt);
            p.finish_node();
        });
    }

    fn parse_type_constraint_list(&mut self) {
        self.start_node(KtSyntaxKind::TypeConstraintList);
        self.bump_as(KtSyntaxKind::SoftKw);
        loop {
            self.start_node(KtSyntaxKind::TypeConstraint);
            self.parse_modifier_list(ModifierContext::Type);
            self.expect(KtSyntaxKind::Ident);
            self.expect(KtSyntaxKind::Colon);
            self.parse_type_reference();
            self.finish_node();
            if !self.eat(KtSyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_contract(&mut self) {
        self.start_node(KtSyntaxKind::ContractEffectList);
        self.bump_as(KtSyntaxKind::SoftKw);
        self.with_newlines_ignored(|p| {
            p.bump();
            while !p.at(KtSyntaxKind::RBracket) && !p.at(KtSyntaxKind::Eof) {
                p.start_node(KtSyntaxKind::ContractEffect);
                p.parse_expression();
                p.finish_node();
                if !p.eat(KtSyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(KtSyntaxKind::RBracket);
        });
        self.finish_node();
    }
}
