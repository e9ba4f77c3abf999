//! Thin wrapper around `rowan::GreenNodeBuilder`

use rowan::{Checkpoint, GreenNodeBuilder};

use super::{CstToken, KtSyntaxKind, KtSyntaxNode};

/// Builds a Kotlin CST from parser events
///
/// Every token pushed through the builder ends up in the tree verbatim, which
/// is what keeps the CST lossless.
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: KtSyntaxKind) {
        self.inner.start_node(kind.into());
    }

    /// Start a node that wraps everything emitted since `checkpoint`
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: KtSyntaxKind) {
        self.inner.start_node_at(checkpoint, kind.into());
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.checkpoint()
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn token(&mut self, kind: KtSyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    pub fn add_token(&mut self, token: &CstToken) {
        self.token(token.kind, &token.text);
    }

    pub fn finish(self) -> KtSyntaxNode {
        KtSyntaxNode::new_root(self.inner.finish())
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
