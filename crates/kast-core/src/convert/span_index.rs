//! Source ranges of converted nodes

use serde::Serialize;

use super::ConvertHook;
use crate::ast::NodeRef;
use crate::cst::{KtSyntaxElement, TextRange};

/// A converted node kind and the source range it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanEntry {
    pub kind: &'static str,
    pub start: u32,
    pub end: u32,
}

impl SpanEntry {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start.into(), self.end.into())
    }
}

/// Records the source range of every node created during a conversion
///
/// Entries are kept in creation order, which is bottom-up: children are
/// recorded before the node that contains them.
#[derive(Debug, Default, Serialize)]
pub struct SpanIndex {
    entries: Vec<SpanEntry>,
}

impl SpanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SpanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one node kind, in creation order
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a SpanEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// Innermost recorded node covering `offset`
    pub fn innermost_at(&self, offset: u32) -> Option<&SpanEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.start <= offset && offset < entry.end)
            .min_by_key(|entry| entry.end - entry.start)
    }
}

impl ConvertHook for SpanIndex {
    fn on_node(&mut self, node: NodeRef<'_>, element: &KtSyntaxElement) {
        let range = element.text_range();
        self.entries.push(SpanEntry {
            kind: node.kind_name(),
            start: range.start().into(),
            end: range.end().into(),
        });
    }
}
