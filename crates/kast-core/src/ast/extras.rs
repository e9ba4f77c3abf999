//! Non-semantic trivia attached to nodes

use serde::{Deserialize, Serialize};

/// What kind of trivia an [`Extra`] holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtraKind {
    /// Spaces, tabs and line breaks, merged into one run
    Whitespace,
    LineComment,
    BlockComment,
    Semicolon,
    Shebang,
}

/// One run of trivia, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extra {
    pub kind: ExtraKind,
    pub text: String,
}

impl Extra {
    pub fn new(kind: ExtraKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Self::new(ExtraKind::Whitespace, text)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, ExtraKind::LineComment | ExtraKind::BlockComment)
    }
}

/// Trivia anchored to a node
///
/// `before` is written ahead of the node, `after` behind it, and `within`
/// where two of the node's own tokens meet (for instance between the braces
/// of an empty block). `within_at[i]` is the index, among the node's own
/// tokens in source order, of the token that `within[i]` precedes. Entries
/// without an index are written after the node's last token.
///
/// Extras never take part in structural equality: two nodes that differ only
/// in their trivia compare equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extras {
    pub before: Vec<Extra>,
    pub within: Vec<Extra>,
    pub after: Vec<Extra>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub within_at: Vec<usize>,
}

impl Extras {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.within.is_empty() && self.after.is_empty()
    }

    /// All trivia in writing order
    pub fn iter(&self) -> impl Iterator<Item = &Extra> {
        self.before
            .iter()
            .chain(self.within.iter())
            .chain(self.after.iter())
    }
}

impl PartialEq for Extras {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Extras {}

/// Uniform access to the trivia of nodes and containers
pub trait HasExtras {
    fn extras(&self) -> &Extras;
    fn extras_mut(&mut self) -> &mut Extras;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extras_ignored_by_equality() {
        let empty = Extras::default();
        let full = Extras {
            before: vec![Extra::whitespace(" ")],
            within: vec![Extra::new(ExtraKind::LineComment, "// x")],
            after: vec![Extra::new(ExtraKind::Semicolon, ";")],
            within_at: vec![1],
        };
        assert_eq!(empty, full);
        assert!(empty.is_empty());
        assert!(!full.is_empty());
    }

    #[test]
    fn test_iter_follows_anchor_order() {
        let extras = Extras {
            before: vec![Extra::whitespace("a")],
            within: vec![Extra::whitespace("b")],
            after: vec![Extra::whitespace("c")],
            within_at: vec![1],
        };
        let text: String = extras.iter().map(|extra| extra.text.as_str()).collect();
        assert_eq!(text, "abc");
    }
}
