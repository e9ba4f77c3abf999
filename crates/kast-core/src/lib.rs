//! Kast Core
//!
//! Lossless Kotlin source to AST to source toolkit. Source text is parsed
//! into a Rowan concrete syntax tree, converted into a typed node tree, and
//! written back out either byte for byte (lossless mode) or in a normalized
//! layout that re-parses to an equal tree.

pub mod ast;
pub mod config;
pub mod convert; // CST to node tree conversion
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod error;
pub mod parser;
pub mod result;
pub mod round_trip;
pub mod visit;
pub mod writer;

// Re-export commonly used types
pub use ast::{AsNodeRef, Extra, ExtraKind, Extras, FromNode, HasExtras, Node, NodeRef, Root};
pub use config::{ConfigLoader, KastConfig};
pub use convert::{ConvertHook, SpanEntry, SpanIndex};
pub use cst::SourceKind;
pub use error::{ErrorKind, KastError};
pub use parser::{
    Diagnostic, KastParser, ParserConfiguration, parse_file, parse_file_lossless, parse_script,
};
pub use result::{Result, ResultExt};
pub use round_trip::{RoundTripValidator, ValidationResult};
pub use visit::{MutableVisitor, NodePath, Visitor, rewrite, rewrite_root, walk, walk_root};
pub use writer::{Writer, WriterConfiguration};

/// Initialize the tracing subscriber for logging
///
/// The filter comes from `KAST_LOG`, defaulting to `kast_core=info`. Calling
/// this more than once keeps the first subscriber.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_env("KAST_LOG").unwrap_or_else(|_| EnvFilter::new("kast_core=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
