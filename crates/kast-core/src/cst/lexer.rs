//! CST-aware lexer that preserves all trivia (whitespace, comments)
//!
//! Every byte of the input ends up in exactly one token, so concatenating the
//! token texts reproduces the source. String templates are lexed with a mode
//! stack: `"..."` and `"""..."""` switch into string mode and `${` switches
//! back into code mode until its matching `}`.

use crate::cst::KtSyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: KtSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: KtSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Regular code; `template` is set inside `${ ... }`
    Code { brace_depth: usize, template: bool },
    /// Inside a string literal
    String { raw: bool },
}

/// Lex input preserving ALL trivia for CST construction
///
/// - Whitespace, newlines and comments are kept as tokens
/// - Soft keywords (`data`, `get`, `by`, ...) stay identifiers
/// - A trailing [`KtSyntaxKind::Eof`] token with empty text closes the stream
///
/// This enables lossless round-tripping: parse(source).text() == source
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut lexer = Lexer::new(input);
    lexer.run();
    lexer.tokens.push(CstToken::new(
        KtSyntaxKind::Eof,
        "",
        span(input.len(), input.len()),
    ));
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    modes: Vec<Mode>,
    tokens: Vec<CstToken>,
    errors: Vec<LexerError>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            modes: vec![Mode::Code {
                brace_depth: 0,
                template: false,
            }],
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(&mut self) {
        if self.input.starts_with("#!") {
            let end = self.line_end(0);
            self.push(KtSyntaxKind::Shebang, 0, end);
        }

        while self.pos < self.input.len() {
            match self.modes.last().copied() {
                Some(Mode::String { raw }) => self.lex_string_part(raw),
                Some(Mode::Code { .. }) => self.lex_code(),
                None => break,
            }
        }

        if let Some(Mode::String { .. }) = self.modes.last() {
            let len = self.input.len();
            self.errors
                .push(LexerError::new("Unterminated string literal", span(len, len)));
        }
    }

    fn push(&mut self, kind: KtSyntaxKind, start: usize, end: usize) {
        self.tokens
            .push(CstToken::new(kind, &self.input[start..end], span(start, end)));
        self.pos = end;
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos..).and_then(|s| s.chars().next())
    }

    fn line_end(&self, from: usize) -> usize {
        self.input[from..]
            .find(['\n', '\r'])
            .map_or(self.input.len(), |rel| from + rel)
    }

    fn lex_code(&mut self) {
        let start = self.pos;
        let Some(current) = self.char_at(start) else {
            return;
        };

        match current {
            '\n' => self.push(KtSyntaxKind::Newline, start, start + 1),
            '\r' => {
                let end = if self.rest().starts_with("\r\n") {
                    start + 2
                } else {
                    start + 1
                };
                self.push(KtSyntaxKind::Newline, start, end);
            }
            c if is_inline_whitespace(c) => {
                let end = self.rest()
                    .find(|ch: char| !is_inline_whitespace(ch))
                    .map_or(self.input.len(), |rel| start + rel);
                self.push(KtSyntaxKind::Whitespace, start, end);
            }
            '/' if self.rest().starts_with("//") => {
                let end = self.line_end(start);
                self.push(KtSyntaxKind::LineComment, start, end);
            }
            '/' if self.rest().starts_with("/*") => self.lex_block_comment(),
            '"' => {
                let raw = self.rest().starts_with("\"\"\"");
                let end = if raw { start + 3 } else { start + 1 };
                self.push(KtSyntaxKind::OpenQuote, start, end);
                self.modes.push(Mode::String { raw });
            }
            '\'' => self.lex_char_literal(),
            '`' => self.lex_backticked_ident(),
            '{' => {
                if let Some(Mode::Code { brace_depth, .. }) = self.modes.last_mut() {
                    *brace_depth += 1;
                }
                self.push(KtSyntaxKind::LBrace, start, start + 1);
            }
            '}' => self.lex_closing_brace(),
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if self.char_at(start + 1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            c if is_ident_start(c) => self.lex_word(),
            '!' => self.lex_exclamation(),
            _ => self.lex_operator(current),
        }
    }

    fn lex_block_comment(&mut self) {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut depth = 0usize;
        let mut i = start;
        while i < bytes.len() {
            if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
                depth += 1;
                i += 2;
            } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    self.push(KtSyntaxKind::BlockComment, start, i);
                    return;
                }
            } else {
                i += 1;
            }
        }
        self.errors.push(LexerError::new(
            "Unterminated block comment",
            span(start, self.input.len()),
        ));
        self.push(KtSyntaxKind::BlockComment, start, self.input.len());
    }

    fn lex_closing_brace(&mut self) {
        let start = self.pos;
        match self.modes.last_mut() {
            Some(Mode::Code {
                brace_depth: 0,
                template: true,
            }) => {
                self.modes.pop();
                self.push(KtSyntaxKind::LongTemplateEntryEnd, start, start + 1);
            }
            Some(Mode::Code { brace_depth, .. }) => {
                *brace_depth = brace_depth.saturating_sub(1);
                self.push(KtSyntaxKind::RBrace, start, start + 1);
            }
            _ => self.push(KtSyntaxKind::RBrace, start, start + 1),
        }
    }

    fn lex_string_part(&mut self, raw: bool) {
        let start = self.pos;
        let rest = self.rest();

        if raw && rest.starts_with("\"\"\"") {
            // Only the last three quotes of a run close a raw string
            let run = rest.chars().take_while(|c| *c == '"').count();
            if run > 3 {
                self.push(KtSyntaxKind::RegularStringPart, start, start + run - 3);
            }
            let close = self.pos;
            self.push(KtSyntaxKind::ClosingQuote, close, close + 3);
            self.modes.pop();
            return;
        }
        if !raw && rest.starts_with('"') {
            self.push(KtSyntaxKind::ClosingQuote, start, start + 1);
            self.modes.pop();
            return;
        }
        if !raw && (rest.starts_with('\n') || rest.starts_with('\r')) {
            self.errors
                .push(LexerError::new("Unterminated string literal", span(start, start)));
            self.modes.pop();
            return;
        }
        if !raw && rest.starts_with('\\') {
            self.lex_escape();
            return;
        }
        if rest.starts_with("${") {
            self.push(KtSyntaxKind::LongTemplateEntryStart, start, start + 2);
            self.modes.push(Mode::Code {
                brace_depth: 0,
                template: true,
            });
            return;
        }
        if rest.starts_with('$') && self.char_at(start + 1).is_some_and(is_ident_start) {
            self.push(KtSyntaxKind::ShortTemplateEntryStart, start, start + 1);
            let word_end = self.word_end(self.pos);
            let kind = if &self.input[self.pos..word_end] == "this" {
                KtSyntaxKind::ThisKw
            } else {
                KtSyntaxKind::Ident
            };
            let word_start = self.pos;
            self.push(kind, word_start, word_end);
            return;
        }

        // Regular text up to the next special character
        let mut end = start;
        for (offset, ch) in rest.char_indices() {
            let at = start + offset;
            let special = match ch {
                '"' => !raw || self.input[at..].starts_with("\"\"\""),
                '\\' | '\n' | '\r' => !raw,
                '$' => {
                    self.input[at..].starts_with("${")
                        || self.char_at(at + 1).is_some_and(is_ident_start)
                }
                _ => false,
            };
            if special && at > start {
                break;
            }
            if special {
                // A lone special char that did not match above is plain text
                end = at + ch.len_utf8();
                break;
            }
            end = at + ch.len_utf8();
        }
        self.push(KtSyntaxKind::RegularStringPart, start, end);
    }

    fn lex_escape(&mut self) {
        let start = self.pos;
        let rest = self.rest();
        if rest.starts_with("\\u") {
            let digits = rest[2..]
                .chars()
                .take(4)
                .take_while(|c| c.is_ascii_hexdigit())
                .count();
            if digits < 4 {
                self.errors.push(LexerError::new(
                    "Illegal unicode escape",
                    span(start, start + 2 + digits),
                ));
            }
            self.push(KtSyntaxKind::EscapeSequence, start, start + 2 + digits);
            return;
        }
        match self.char_at(start + 1) {
            Some(ch) if ch != '\n' && ch != '\r' => {
                if !matches!(ch, 't' | 'b' | 'n' | 'r' | '\'' | '"' | '\\' | '$') {
                    self.errors.push(LexerError::new(
                        format!("Illegal escape: '\\{ch}'"),
                        span(start, start + 1 + ch.len_utf8()),
                    ));
                }
                self.push(KtSyntaxKind::EscapeSequence, start, start + 1 + ch.len_utf8());
            }
            _ => {
                self.errors
                    .push(LexerError::new("Illegal escape", span(start, start + 1)));
                self.push(KtSyntaxKind::EscapeSequence, start, start + 1);
            }
        }
    }

    fn lex_char_literal(&mut self) {
        let start = self.pos;
        let mut i = start + 1;
        let mut escaped = false;
        while let Some(ch) = self.char_at(i) {
            if ch == '\n' || ch == '\r' {
                break;
            }
            i += ch.len_utf8();
            if escaped {
                escaped = false;
                continue;
            }
            if ch == '\\' {
                escaped = true;
            } else if ch == '\'' {
                self.push(KtSyntaxKind::CharLiteral, start, i);
                return;
            }
        }
        self.errors
            .push(LexerError::new("Unterminated character literal", span(start, i)));
        self.push(KtSyntaxKind::CharLiteral, start, i);
    }

    fn lex_backticked_ident(&mut self) {
        let start = self.pos;
        let rest = &self.input[start + 1..];
        match rest.find(['`', '\n', '\r']) {
            Some(rel) if rest[rel..].starts_with('`') => {
                self.push(KtSyntaxKind::Ident, start, start + 1 + rel + 1);
            }
            found => {
                let end = found.map_or(self.input.len(), |rel| start + 1 + rel);
                self.errors
                    .push(LexerError::new("Unterminated backticked name", span(start, end)));
                self.push(KtSyntaxKind::Ident, start, end);
            }
        }
    }

    fn word_end(&self, from: usize) -> usize {
        self.input[from..]
            .find(|ch: char| !is_ident_part(ch))
            .map_or(self.input.len(), |rel| from + rel)
    }

    fn lex_word(&mut self) {
        let start = self.pos;
        let end = self.word_end(start);
        let word = &self.input[start..end];
        let kind = KtSyntaxKind::hard_keyword(word).unwrap_or(KtSyntaxKind::Ident);

        if kind == KtSyntaxKind::AsKw && self.input[end..].starts_with('?') {
            self.push(KtSyntaxKind::AsSafeKw, start, end + 1);
            return;
        }
        self.push(kind, start, end);
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut i = start;
        let mut float = false;

        let digits = |i: &mut usize, pred: fn(u8) -> bool| {
            while *i < bytes.len() && (pred(bytes[*i]) || bytes[*i] == b'_') {
                *i += 1;
            }
        };

        let lower_prefix = self.input[start..].get(..2).map(str::to_ascii_lowercase);
        match lower_prefix.as_deref() {
            Some("0x") => {
                i += 2;
                digits(&mut i, |b| b.is_ascii_hexdigit());
            }
            Some("0b") => {
                i += 2;
                digits(&mut i, |b| b == b'0' || b == b'1');
            }
            _ => {
                digits(&mut i, |b| b.is_ascii_digit());
                if i < bytes.len()
                    && bytes[i] == b'.'
                    && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
                {
                    float = true;
                    i += 1;
                    digits(&mut i, |b| b.is_ascii_digit());
                }
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        float = true;
                        i = j;
                        digits(&mut i, |b| b.is_ascii_digit());
                    }
                }
                if i < bytes.len() && (bytes[i] == b'f' || bytes[i] == b'F') {
                    float = true;
                    i += 1;
                }
            }
        }

        if !float {
            if i < bytes.len() && (bytes[i] == b'u' || bytes[i] == b'U') {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'L' {
                i += 1;
            }
        }

        let kind = if float {
            KtSyntaxKind::FloatLiteral
        } else {
            KtSyntaxKind::IntLiteral
        };
        self.push(kind, start, i);
    }

    fn lex_exclamation(&mut self) {
        let start = self.pos;
        let rest = self.rest();
        for (word, kind) in [("!in", KtSyntaxKind::NotInKw), ("!is", KtSyntaxKind::NotIsKw)] {
            if rest.starts_with(word)
                && !self.char_at(start + word.len()).is_some_and(is_ident_part)
            {
                self.push(kind, start, start + word.len());
                return;
            }
        }
        self.lex_operator('!');
    }

    fn lex_operator(&mut self, current: char) {
        const OPERATORS: &[(&str, KtSyntaxKind)] = &[
            ("..<", KtSyntaxKind::RangeUntil),
            ("===", KtSyntaxKind::EqEqEq),
            ("!==", KtSyntaxKind::ExclEqEq),
            ("?.", KtSyntaxKind::SafeDot),
            ("?:", KtSyntaxKind::Elvis),
            ("::", KtSyntaxKind::ColonColon),
            ("->", KtSyntaxKind::Arrow),
            ("++", KtSyntaxKind::PlusPlus),
            ("--", KtSyntaxKind::MinusMinus),
            ("&&", KtSyntaxKind::AndAnd),
            ("||", KtSyntaxKind::OrOr),
            ("==", KtSyntaxKind::EqEq),
            ("!=", KtSyntaxKind::ExclEq),
            ("<=", KtSyntaxKind::LtEq),
            (">=", KtSyntaxKind::GtEq),
            ("+=", KtSyntaxKind::PlusEq),
            ("-=", KtSyntaxKind::MinusEq),
            ("*=", KtSyntaxKind::StarEq),
            ("/=", KtSyntaxKind::SlashEq),
            ("%=", KtSyntaxKind::PercentEq),
            ("..", KtSyntaxKind::Range),
            ("!!", KtSyntaxKind::ExclExcl),
            ("(", KtSyntaxKind::LParen),
            (")", KtSyntaxKind::RParen),
            ("[", KtSyntaxKind::LBracket),
            ("]", KtSyntaxKind::RBracket),
            (",", KtSyntaxKind::Comma),
            (".", KtSyntaxKind::Dot),
            (":", KtSyntaxKind::Colon),
            (";", KtSyntaxKind::Semicolon),
            ("@", KtSyntaxKind::At),
            ("?", KtSyntaxKind::Question),
            ("#", KtSyntaxKind::Hash),
            ("+", KtSyntaxKind::Plus),
            ("-", KtSyntaxKind::Minus),
            ("*", KtSyntaxKind::Star),
            ("/", KtSyntaxKind::Slash),
            ("%", KtSyntaxKind::Percent),
            ("!", KtSyntaxKind::Excl),
            ("=", KtSyntaxKind::Eq),
            ("<", KtSyntaxKind::Lt),
            (">", KtSyntaxKind::Gt),
        ];

        let start = self.pos;
        let rest = self.rest();
        if let Some((text, kind)) = OPERATORS.iter().find(|(text, _)| rest.starts_with(text)) {
            self.push(*kind, start, start + text.len());
            return;
        }

        let end = start + current.len_utf8();
        self.errors.push(LexerError::new(
            format!("Unexpected character: '{current}'"),
            span(start, end),
        ));
        self.push(KtSyntaxKind::ErrorToken, start, end);
    }
}

fn is_inline_whitespace(ch: char) -> bool {
    ch.is_whitespace() && ch != '\n' && ch != '\r'
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn span(start: usize, end: usize) -> CstSpan {
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<KtSyntaxKind> {
        let (tokens, errors) = lex_with_trivia(input);
        assert!(errors.is_empty(), "Unexpected lexer errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn reconstruct(input: &str) -> String {
        let (tokens, _) = lex_with_trivia(input);
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_preserves_whitespace_and_newlines() {
        use KtSyntaxKind::*;
        assert_eq!(
            kinds("val  x\r\n"),
            vec![ValKw, Whitespace, Ident, Newline, Eof]
        );
    }

    #[test]
    fn test_lossless_reconstruction() {
        let source = "package a.b\n\n/* doc /* nested */ */\nfun main() { println(\"hi ${name}!\") } // end\n";
        assert_eq!(reconstruct(source), source);
    }

    #[test]
    fn test_nested_block_comment() {
        let (tokens, errors) = lex_with_trivia("/* a /* b */ c */x");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, KtSyntaxKind::BlockComment);
        assert_eq!(tokens[0].text, "/* a /* b */ c */");
        assert_eq!(tokens[1].kind, KtSyntaxKind::Ident);
    }

    #[test]
    fn test_string_template_tokens() {
        use KtSyntaxKind::*;
        assert_eq!(
            kinds(r#""a$b\n${c}A""#),
            vec![
                OpenQuote,
                RegularStringPart,
                ShortTemplateEntryStart,
                Ident,
                EscapeSequence,
                LongTemplateEntryStart,
                Ident,
                LongTemplateEntryEnd,
                RegularStringPart,
                ClosingQuote,
                Eof
            ]
        );
    }

    #[test]
    fn test_braces_inside_template_expression() {
        use KtSyntaxKind::*;
        assert_eq!(
            kinds(r#""${f { 1 }}""#),
            vec![
                OpenQuote,
                LongTemplateEntryStart,
                Ident,
                Whitespace,
                LBrace,
                Whitespace,
                IntLiteral,
                Whitespace,
                RBrace,
                LongTemplateEntryEnd,
                ClosingQuote,
                Eof
            ]
        );
    }

    #[test]
    fn test_raw_string_keeps_extra_quotes() {
        let (tokens, errors) = lex_with_trivia("\"\"\"a\"\"\"\"");
        assert!(errors.is_empty());
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["\"\"\"", "a", "\"", "\"\"\"", ""]);
    }

    #[test]
    fn test_numbers() {
        use KtSyntaxKind::*;
        assert_eq!(kinds("1"), vec![IntLiteral, Eof]);
        assert_eq!(kinds("0xFF_FFL"), vec![IntLiteral, Eof]);
        assert_eq!(kinds("1.5e-3f"), vec![FloatLiteral, Eof]);
        assert_eq!(kinds("1..2"), vec![IntLiteral, Range, IntLiteral, Eof]);
        assert_eq!(kinds("1.toString"), vec![IntLiteral, Dot, Ident, Eof]);
        assert_eq!(kinds("42uL"), vec![IntLiteral, Eof]);
    }

    #[test]
    fn test_negated_keywords_and_operators() {
        use KtSyntaxKind::*;
        assert_eq!(kinds("a !in b"), vec![Ident, Whitespace, NotInKw, Whitespace, Ident, Eof]);
        assert_eq!(kinds("!isReady"), vec![Excl, Ident, Eof]);
        assert_eq!(kinds("x!!"), vec![Ident, ExclExcl, Eof]);
        assert_eq!(kinds("a as? B"), vec![Ident, Whitespace, AsSafeKw, Whitespace, Ident, Eof]);
        assert_eq!(kinds("a?.b ?: c"), vec![Ident, SafeDot, Ident, Whitespace, Elvis, Whitespace, Ident, Eof]);
    }

    #[test]
    fn test_char_literals() {
        use KtSyntaxKind::*;
        assert_eq!(kinds(r"'a'"), vec![CharLiteral, Eof]);
        assert_eq!(kinds(r"'\''"), vec![CharLiteral, Eof]);
        assert_eq!(kinds(r"'A'"), vec![CharLiteral, Eof]);
    }

    #[test]
    fn test_backticked_identifier() {
        let (tokens, errors) = lex_with_trivia("`my name`");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, KtSyntaxKind::Ident);
        assert_eq!(tokens[0].text, "`my name`");
    }

    #[test]
    fn test_shebang() {
        let (tokens, _) = lex_with_trivia("#!/usr/bin/env kotlin\nval x = 1");
        assert_eq!(tokens[0].kind, KtSyntaxKind::Shebang);
        assert_eq!(tokens[1].kind, KtSyntaxKind::Newline);
    }

    #[test]
    fn test_errors_are_reported() {
        let (tokens, errors) = lex_with_trivia("a & b");
        assert_eq!(errors.len(), 1);
        assert!(tokens.iter().any(|t| t.kind == KtSyntaxKind::ErrorToken));

        let (_, errors) = lex_with_trivia("\"abc");
        assert_eq!(errors.len(), 1);
    }
}
