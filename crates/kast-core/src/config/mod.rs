//! Configuration for parser and writer
//!
//! Settings live in a `kast.toml` or `.kastrc.json` file, found by walking up
//! from the working directory. Every field is optional:
//!
//! ```toml
//! [parser]
//! source_kind = "script"
//! lossless = true
//!
//! [writer]
//! extras = true
//! indent_size = 2
//! ```

mod loader;

use serde::{Deserialize, Serialize};

use crate::parser::{KastParser, ParserConfiguration};
use crate::writer::{Writer, WriterConfiguration};

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KastConfig {
    pub parser: ParserConfiguration,
    pub writer: WriterConfiguration,
}

impl KastConfig {
    pub fn parser(&self) -> KastParser {
        KastParser::new(self.parser)
    }

    pub fn writer(&self) -> Writer {
        Writer::new(self.writer.clone())
    }

    /// Parser and writer both in lossless mode
    pub fn lossless() -> Self {
        Self {
            parser: ParserConfiguration::file().lossless(),
            writer: WriterConfiguration::lossless(),
        }
    }
}
