//! Concrete Syntax Tree (CST) for Kotlin source
//!
//! This module is the front-end of the toolkit. It turns source text into a
//! lossless syntax tree using the Rowan library. Every byte of the input,
//! including whitespace, comments, semicolons and a shebang line, is kept in
//! the tree so that `parse(source).text() == source`.
//!
//! ## Architecture
//!
//! - **Lexer** ([`lex_with_trivia`]): produces tokens and trivia tokens. A mode
//!   stack tracks string templates and the braces of `${...}` entries.
//! - **Parser** ([`parse_kotlin`]): recursive descent over the token stream,
//!   feeding a [`CstBuilder`]. Node kinds mirror the shapes of the reference
//!   Kotlin PSI closely enough for the converter to map them one to one.
//!
//! Newlines are significant: they terminate statements unless they appear
//! inside parentheses or brackets, or before a continuation operator such as
//! `?:` or `&&`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use kast_core::cst::{parse_kotlin, KtSyntaxKind, SourceKind};
//!
//! let (cst, errors) = parse_kotlin("val x = 1 // one\n", SourceKind::File);
//! assert!(errors.is_empty());
//! assert_eq!(cst.text().to_string(), "val x = 1 // one\n");
//!
//! for element in cst.descendants_with_tokens() {
//!     if element.kind() == KtSyntaxKind::LineComment {
//!         println!("comment: {element}");
//!     }
//! }
//! ```

mod builder;
mod language;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub use builder::CstBuilder;
pub use language::KtLanguage;
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use nodes::*;
pub use parser::{SourceKind, SyntaxError, SyntaxErrorKind, parse_kotlin};
pub use syntax_kind::KtSyntaxKind;
