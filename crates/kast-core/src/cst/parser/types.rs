//! Type references

use super::{ModifierContext, Parser};
use crate::cst::KtSyntaxKind;

impl Parser<'_> {
    /// `TypeReference[ModifierList?, element]`
    pub(super) fn parse_type_reference(&mut self) {
        self.start_node(KtSyntaxKind::TypeReference);
        self.parse_modifier_list(ModifierContext::Type);
        self.parse_type_element();
        self.finish_node();
    }

    fn parse_type_element(&mut self) {
        if self.at_ident("context") && self.nth(1) == KtSyntaxKind::LParen {
            self.start_node(KtSyntaxKind::FunctionType);
            self.parse_context_receivers();
            if self.function_parameters_ahead(0) {
                self.parse_function_type_tail();
            } else {
                let checkpoint = self.checkpoint();
                self.parse_nullable_element();
                self.parse_function_type_receiver(checkpoint);
            }
            self.finish_node();
            return;
        }

        if self.function_parameters_ahead(0) {
            self.start_node(KtSyntaxKind::FunctionType);
            self.parse_function_type_tail();
            self.finish_node();
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_nullable_element();
        if self.at_receiver_function_type() {
            self.start_node_at(checkpoint, KtSyntaxKind::FunctionType);
            self.parse_function_type_receiver(checkpoint);
            self.finish_node();
        }
    }

    /// `(...)` at offset `n` followed by `->`
    fn function_parameters_ahead(&self, n: usize) -> bool {
        self.nth(n) == KtSyntaxKind::LParen
            && self.nth(self.skip_balanced(n, KtSyntaxKind::LParen, KtSyntaxKind::RParen))
                == KtSyntaxKind::Arrow
    }

    /// `.(` of `Receiver.() -> R`, unless that dot ends a declaration receiver
    fn at_receiver_function_type(&self) -> bool {
        self.at(KtSyntaxKind::Dot)
            && self.receiver_dot != Some(self.nth_index(0))
            && self.function_parameters_ahead(1)
    }

    /// Wrap what was parsed since `checkpoint` as the receiver, then parse the rest
    fn parse_function_type_receiver(&mut self, checkpoint: rowan::Checkpoint) {
        self.start_node_at(checkpoint, KtSyntaxKind::FunctionTypeReceiver);
        self.start_node_at(checkpoint, KtSyntaxKind::TypeReference);
        self.finish_node();
        self.finish_node();
        self.expect(KtSyntaxKind::Dot);
        self.parse_function_type_tail();
    }

    fn parse_context_receivers(&mut self) {
        self.start_node(KtSyntaxKind::ContextReceiverList);
        self.bump_as(KtSyntaxKind::SoftKw);
        self.with_newlines_ignored(|p| {
            p.bump();
            while !p.at(KtSyntaxKind::RParen) && !p.at(KtSyntaxKind::Eof) {
                p.parse_type_reference();
                if !p.eat(KtSyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(KtSyntaxKind::RParen);
        });
        self.finish_node();
    }

    /// `(a: A, B) -> R`
    fn parse_function_type_tail(&mut self) {
        self.with_newlines_ignored(|p| {
            p.start_node(KtSyntaxKind::ValueParameterList);
            p.expect(KtSyntaxKind::LParen);
            while !p.at(KtSyntaxKind::RParen) && !p.at(KtSyntaxKind::Eof) {
                p.start_node(KtSyntaxKind::FunctionTypeParameter);
                if p.at(KtSyntaxKind::Ident) && p.nth(1) == KtSyntaxKind::Colon {
                    p.bump();
                    p.bump();
                }
                p.parse_type_reference();
                p.finish_node();
                if !p.eat(KtSyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(KtSyntaxKind::RParen);
            p.finish_node();
        });
        self.expect(KtSyntaxKind::Arrow);
        self.parse_type_reference();
    }

    /// A simple, parenthesized or dynamic type with `?` suffixes
    fn parse_nullable_element(&mut self) {
        let checkpoint = self.checkpoint();
        match self.current() {
            KtSyntaxKind::LParen => {
                self.start_node(KtSyntaxKind::ParenthesizedType);
                self.with_newlines_ignored(|p| {
                    p.bump();
                    p.parse_type_reference();
                    p.expect(KtSyntaxKind::RParen);
                });
                self.finish_node();
            }
            KtSyntaxKind::Ident
                if self.at_ident("dynamic")
                    && !matches!(self.nth(1), KtSyntaxKind::Dot | KtSyntaxKind::Lt) =>
            {
                self.start_node(KtSyntaxKind::DynamicType);
                self.bump_as(KtSyntaxKind::SoftKw);
                self.finish_node();
            }
            KtSyntaxKind::Ident => self.parse_user_type(),
            _ => {
                self.error("Expecting a type");
                return;
            }
        }

        while self.at(KtSyntaxKind::Question) && !self.newline_before() {
            self.start_node_at(checkpoint, KtSyntaxKind::NullableType);
            self.bump();
            self.finish_node();
        }
    }

    /// `a.b<T>.C`, nested with the innermost qualifier first
    pub(super) fn parse_user_type(&mut self) {
        let checkpoint = self.checkpoint();
        self.start_node(KtSyntaxKind::UserType);
        self.parse_reference();
        if self.at(KtSyntaxKind::Lt) {
            self.parse_type_argument_list();
        }
        self.finish_node();

        while self.at(KtSyntaxKind::Dot)
            && self.nth(1) == KtSyntaxKind::Ident
            && self.receiver_dot != Some(self.nth_index(0))
        {
            self.start_node_at(checkpoint, KtSyntaxKind::UserType);
            self.bump();
            self.parse_reference();
            if self.at(KtSyntaxKind::Lt) {
                self.parse_type_argument_list();
            }
            self.finish_node();
        }
    }

    pub(super) fn parse_type_argument_list(&mut self) {
        self.with_newlines_ignored(|p| {
            p.start_node(KtSyntaxKind::TypeArgumentList);
            p.bump();
            while !p.at(KtSyntaxKind::Gt) && !p.at(KtSyntaxKind::Eof) {
                p.start_node(KtSyntaxKind::TypeProjection);
                if !p.eat(KtSyntaxKind::Star) {
                    p.parse_modifier_list(ModifierContext::Variance);
                    p.parse_type_reference();
                }
                p.finish_node();
                if !p.eat(KtSyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(KtSyntaxKind::Gt);
            p.finish_node();
        });
    }
}
