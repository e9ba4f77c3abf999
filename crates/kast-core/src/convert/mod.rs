//! Conversion from the CST to the typed tree
//!
//! The converter walks the rowan tree produced by [`parse_kotlin`] and builds
//! [`Root`] nodes. It keeps its own cursor over the flat token stream of the
//! CST: every significant token a node owns is checked off against the cursor,
//! and trivia found in between is gathered for the lossless mode.
//!
//! ## Trivia attachment
//!
//! When a node starts, pending trivia becomes its `before`. When a node ends,
//! the trivia that immediately follows it becomes its `after`, so trivia
//! between two siblings always lands on the earlier one. Trivia between two
//! tokens owned by the same node goes to its `within`, each entry tagged with
//! the index of the own token it precedes. Semicolons count as trivia.
//!
//! In plain mode the same walk runs but all trivia is dropped.
//!
//! [`parse_kotlin`]: crate::cst::parse_kotlin

mod control;
mod declarations;
mod expressions;
mod members;
mod span_index;
mod types;

use std::mem;

use tracing::{debug, trace};

use crate::ast::{
    AsNodeRef, CommaSeparatedNodeList, Extra, ExtraKind, Extras, Keyword, KeywordKind, Name,
    NodeList, NodeRef, Root,
};
use crate::cst::{KtSyntaxElement, KtSyntaxKind, KtSyntaxNode, KtSyntaxToken};
use crate::error::KastError;
use crate::result::Result;

pub use span_index::{SpanEntry, SpanIndex};

/// Observer called for every node the converter creates
///
/// Nodes are reported bottom-up, each with the CST element it came from.
pub trait ConvertHook {
    fn on_node(&mut self, node: NodeRef<'_>, element: &KtSyntaxElement);
}

impl<F> ConvertHook for F
where
    F: FnMut(NodeRef<'_>, &KtSyntaxElement),
{
    fn on_node(&mut self, node: NodeRef<'_>, element: &KtSyntaxElement) {
        self(node, element);
    }
}

/// Trivia state of a node under construction
#[derive(Default)]
struct Frame {
    before: Vec<Extra>,
    within: Vec<Extra>,
    /// Own tokens consumed so far
    owned: usize,
    /// Value of `owned` when each `within` entry was met
    within_at: Vec<usize>,
}

/// CST to typed-tree converter
pub struct Converter<'h> {
    extras: bool,
    tokens: Vec<KtSyntaxToken>,
    pos: usize,
    pending: Vec<Extra>,
    frames: Vec<Frame>,
    hook: Option<&'h mut dyn ConvertHook>,
    created: usize,
}

impl Converter<'static> {
    /// A converter; `extras` enables the lossless mode
    pub fn new(extras: bool) -> Self {
        Self {
            extras,
            tokens: Vec::new(),
            pos: 0,
            pending: Vec::new(),
            frames: Vec::new(),
            hook: None,
            created: 0,
        }
    }
}

impl<'h> Converter<'h> {
    /// Report every created node to `hook`
    pub fn with_hook<'a>(self, hook: &'a mut dyn ConvertHook) -> Converter<'a> {
        Converter {
            extras: self.extras,
            tokens: self.tokens,
            pos: self.pos,
            pending: self.pending,
            frames: self.frames,
            hook: Some(hook),
            created: self.created,
        }
    }

    /// Convert a `KtFile` or `Script` CST root
    pub fn convert(mut self, root: &KtSyntaxNode) -> Result<Root> {
        self.tokens = root
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .collect();
        self.pos = 0;

        let converted = match root.kind() {
            KtSyntaxKind::KtFile => Root::File(self.file(root)?),
            KtSyntaxKind::Script => Root::Script(self.script(root)?),
            kind => {
                return Err(KastError::unsupported(format!(
                    "unsupported syntax: {kind} is not a root"
                )));
            }
        };

        self.scan();
        if let Some(token) = self.tokens.get(self.pos) {
            return Err(unexpected_token(token));
        }
        debug!(
            nodes = self.created,
            tokens = self.tokens.len(),
            extras = self.extras,
            "Converted CST"
        );
        Ok(converted)
    }

    // ==================
    // Token cursor
    // ==================

    /// Move trivia under the cursor into `pending`
    fn scan(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            let kind = match token.kind() {
                KtSyntaxKind::Whitespace | KtSyntaxKind::Newline => ExtraKind::Whitespace,
                KtSyntaxKind::LineComment => ExtraKind::LineComment,
                KtSyntaxKind::BlockComment => ExtraKind::BlockComment,
                KtSyntaxKind::Semicolon => ExtraKind::Semicolon,
                KtSyntaxKind::Shebang => ExtraKind::Shebang,
                _ => break,
            };
            if self.extras {
                match self.pending.last_mut() {
                    Some(last)
                        if last.kind == ExtraKind::Whitespace && kind == ExtraKind::Whitespace =>
                    {
                        last.text.push_str(token.text());
                    }
                    _ => self.pending.push(Extra::new(kind, token.text())),
                }
            }
            self.pos += 1;
        }
    }

    /// Start a node: pending trivia becomes its `before`
    fn open(&mut self) {
        self.scan();
        let before = mem::take(&mut self.pending);
        self.frames.push(Frame {
            before,
            ..Frame::default()
        });
    }

    /// Check off a token owned by the innermost open node
    fn own(&mut self, token: &KtSyntaxToken) -> Result<()> {
        self.scan();
        match self.tokens.get(self.pos) {
            Some(next) if next.text_range() == token.text_range() => {}
            Some(next) => return Err(unexpected_token(next)),
            None => return Err(unexpected_token(token)),
        }
        self.pos += 1;

        let pending = mem::take(&mut self.pending);
        let Some(frame) = self.frames.last_mut() else {
            return Err(KastError::unsupported(
                "unsupported syntax: token outside of any node",
            ));
        };
        frame
            .within_at
            .extend(std::iter::repeat_n(frame.owned, pending.len()));
        frame.within.extend(pending);
        frame.owned += 1;
        Ok(())
    }

    /// End a node: trivia right after it becomes its `after`
    fn close(&mut self) -> Extras {
        self.scan();
        let frame = self.frames.pop().unwrap_or_default();
        Extras {
            before: frame.before,
            within: frame.within,
            after: mem::take(&mut self.pending),
            within_at: frame.within_at,
        }
    }

    /// Report a finished node to the hook
    fn created<T: AsNodeRef>(&mut self, node: T, element: impl Into<KtSyntaxElement>) -> T {
        self.created += 1;
        if let Some(hook) = self.hook.as_deref_mut() {
            let element = element.into();
            trace!(kind = node.as_node_ref().kind_name(), range = ?element.text_range(), "Created node");
            hook.on_node(node.as_node_ref(), &element);
        }
        node
    }

    // ==================
    // Leaves
    // ==================

    fn name(&mut self, token: &KtSyntaxToken) -> Result<Name> {
        self.open();
        self.own(token)?;
        let extras = self.close();
        let name = Name {
            text: token.text().to_string(),
            extras,
        };
        Ok(self.created(name, token.clone()))
    }

    fn keyword(&mut self, token: &KtSyntaxToken) -> Result<Keyword> {
        let kind: KeywordKind = token.text().parse()?;
        self.open();
        self.own(token)?;
        let extras = self.close();
        Ok(self.created(Keyword { kind, extras }, token.clone()))
    }

    // ==================
    // Containers
    // ==================

    /// Comma-separated child nodes accepted by `is_item`, within optional markers
    fn comma_list<T>(
        &mut self,
        elements: &mut Elements,
        prefix: Option<&'static str>,
        suffix: Option<&'static str>,
        is_item: impl Fn(KtSyntaxKind) -> bool,
        mut item: impl FnMut(&mut Self, &KtSyntaxNode) -> Result<T>,
    ) -> Result<CommaSeparatedNodeList<T>> {
        self.open();
        if let Some(prefix) = prefix {
            let token = elements.expect_text(prefix)?;
            self.own(&token)?;
        }

        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            if let Some(node) = elements.node_where(&is_item) {
                items.push(item(self, &node)?);
                trailing_comma = false;
            } else if let Some(comma) = elements.token(KtSyntaxKind::Comma) {
                self.own(&comma)?;
                trailing_comma = true;
            } else {
                break;
            }
        }

        if let Some(suffix) = suffix {
            let token = elements.expect_text(suffix)?;
            self.own(&token)?;
        }
        let extras = self.close();
        Ok(CommaSeparatedNodeList {
            elements: items,
            trailing_comma,
            prefix,
            suffix,
            extras,
        })
    }

    /// Child nodes accepted by `is_item`, within optional markers
    fn node_list<T>(
        &mut self,
        elements: &mut Elements,
        prefix: Option<&'static str>,
        suffix: Option<&'static str>,
        is_item: impl Fn(KtSyntaxKind) -> bool,
        mut item: impl FnMut(&mut Self, &KtSyntaxNode) -> Result<T>,
    ) -> Result<NodeList<T>> {
        self.open();
        if let Some(prefix) = prefix {
            let token = elements.expect_text(prefix)?;
            self.own(&token)?;
        }
        let mut items = Vec::new();
        while let Some(node) = elements.node_where(&is_item) {
            items.push(item(self, &node)?);
        }
        if let Some(suffix) = suffix {
            let token = elements.expect_text(suffix)?;
            self.own(&token)?;
        }
        let extras = self.close();
        Ok(NodeList {
            elements: items,
            prefix,
            suffix,
            extras,
        })
    }
}

/// Cursor over the significant children of a CST node
struct Elements {
    parent: KtSyntaxKind,
    items: Vec<KtSyntaxElement>,
    index: usize,
}

impl Elements {
    fn new(node: &KtSyntaxNode) -> Self {
        Self {
            parent: node.kind(),
            items: node
                .children_with_tokens()
                .filter(|element| !element.kind().is_extra())
                .collect(),
            index: 0,
        }
    }

    fn peek(&self) -> Option<&KtSyntaxElement> {
        self.items.get(self.index)
    }

    fn peek_kind(&self) -> Option<KtSyntaxKind> {
        self.peek().map(|element| element.kind())
    }

    fn at(&self, kind: KtSyntaxKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Take the next element if it is a token of `kind`
    fn token(&mut self, kind: KtSyntaxKind) -> Option<KtSyntaxToken> {
        let token = self.peek()?.as_token()?.clone();
        if token.kind() != kind {
            return None;
        }
        self.index += 1;
        Some(token)
    }

    /// Take the next element if it is any token
    fn any_token(&mut self) -> Option<KtSyntaxToken> {
        let token = self.peek()?.as_token()?.clone();
        self.index += 1;
        Some(token)
    }

    /// Take the next element if it is a node of `kind`
    fn node(&mut self, kind: KtSyntaxKind) -> Option<KtSyntaxNode> {
        self.node_where(|k| k == kind)
    }

    fn node_where(&mut self, accept: impl Fn(KtSyntaxKind) -> bool) -> Option<KtSyntaxNode> {
        let node = self.peek()?.as_node()?.clone();
        if !accept(node.kind()) {
            return None;
        }
        self.index += 1;
        Some(node)
    }

    /// Take the next element if it is a node of any kind
    fn any_node(&mut self) -> Option<KtSyntaxNode> {
        self.node_where(|_| true)
    }

    fn expect_token(&mut self, kind: KtSyntaxKind) -> Result<KtSyntaxToken> {
        self.token(kind).ok_or_else(|| self.unexpected(&kind.to_string()))
    }

    fn expect_text(&mut self, text: &str) -> Result<KtSyntaxToken> {
        match self.peek().and_then(|element| element.as_token()) {
            Some(token) if token.text() == text => {
                let token = token.clone();
                self.index += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(&format!("'{text}'"))),
        }
    }

    fn expect_node(&mut self, kind: KtSyntaxKind) -> Result<KtSyntaxNode> {
        self.node(kind).ok_or_else(|| self.unexpected(&kind.to_string()))
    }

    fn expect_any_node(&mut self) -> Result<KtSyntaxNode> {
        self.any_node()
            .ok_or_else(|| self.unexpected("a syntax node"))
    }

    /// Every significant child must have been consumed
    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(element) => Err(unexpected_element(self.parent, element)),
        }
    }

    fn unexpected(&self, expected: &str) -> KastError {
        match self.peek() {
            Some(element) => KastError::unsupported(format!(
                "unsupported syntax: expected {expected} in {}, found {}",
                self.parent,
                element.kind()
            )),
            None => KastError::unsupported(format!(
                "unsupported syntax: expected {expected} at the end of {}",
                self.parent
            )),
        }
    }
}

fn unexpected_token(token: &KtSyntaxToken) -> KastError {
    let offset: u32 = token.text_range().start().into();
    KastError::unsupported(format!(
        "unsupported syntax: unexpected '{}' at offset {offset}",
        token.text()
    ))
}

fn unexpected_element(parent: KtSyntaxKind, element: &KtSyntaxElement) -> KastError {
    KastError::unsupported(format!(
        "unsupported syntax: unexpected {} in {parent}",
        element.kind()
    ))
}

#[cfg(test)]
mod tests;
