//! Error types for parsing, conversion and configuration

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::Diagnostic;

/// Main error type of the toolkit
#[derive(Debug, Error)]
pub enum KastError {
    /// The source is not valid syntax; carries every diagnostic, not just the first
    #[error("Parse error: {}", summarize(diagnostics))]
    Parse { diagnostics: Vec<Diagnostic> },

    /// Valid syntax that the node model deliberately does not represent
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "no diagnostics".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Unsupported,
    Config,
    Io,
}

impl KastError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            KastError::Parse { .. } => ErrorKind::Parse,
            KastError::Unsupported { .. } => ErrorKind::Unsupported,
            KastError::Config { .. } => ErrorKind::Config,
            KastError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether processing can go on with the next source unit
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Unsupported)
    }

    pub fn parse_error(diagnostics: Vec<Diagnostic>) -> Self {
        Self::Parse { diagnostics }
    }

    /// Create an unsupported-construct error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Diagnostics of a parse error, empty for other kinds
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            KastError::Parse { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for KastError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<crate::ast::UnknownKeyword> for KastError {
    fn from(err: crate::ast::UnknownKeyword) -> Self {
        Self::unsupported(err.to_string())
    }
}
