//! Read-only and rewriting traversals over node trees
//!
//! - [`Visitor`] sees every node once, depth-first in pre-order, together
//!   with its parent.
//! - [`MutableVisitor`] may hand back replacement nodes. Trees are never
//!   changed in place: ancestors of a replaced node are rebuilt, everything
//!   else is shared with the input, and a pass that replaces nothing returns
//!   the input itself.

mod mutable;
mod visitor;

pub use mutable::{MutableVisitor, NodePath, rewrite, rewrite_root};
pub use visitor::{Visitor, walk, walk_root};
