//! Type aliases for Kotlin CST nodes
//!
//! These types are Rowan's generic tree types parameterized with
//! [`KtLanguage`].

use super::KtLanguage;

/// A node in the Kotlin concrete syntax tree
///
/// Provides parent/child/sibling navigation and lossless text:
/// `parse_kotlin(src).0.text() == src`.
pub type KtSyntaxNode = rowan::SyntaxNode<KtLanguage>;

/// A token (leaf) in the Kotlin concrete syntax tree
pub type KtSyntaxToken = rowan::SyntaxToken<KtLanguage>;

/// Either a node or a token
pub type KtSyntaxElement = rowan::SyntaxElement<KtLanguage>;

pub use rowan::{TextRange, TextSize};
