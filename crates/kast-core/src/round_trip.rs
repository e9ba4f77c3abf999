//! Round-trip validation for Kotlin source
//!
//! The validator checks the two writer guarantees on a piece of source:
//!
//! 1. a lossless parse written back with extras reproduces the source byte
//!    for byte
//! 2. the default-mode output parses back to an equal tree, and writing that
//!    tree again gives the same text
//!
//! ```rust,ignore
//! use kast_core::round_trip::RoundTripValidator;
//!
//! let result = RoundTripValidator::new().validate("val x = 1 // one\n")?;
//! assert!(result.is_valid());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cst::SourceKind;
use crate::error::KastError;
use crate::parser::{KastParser, ParserConfiguration};
use crate::result::{Result, ResultExt};
use crate::writer::{Writer, WriterConfiguration};

/// Characters of context shown around a text difference
const CONTEXT_CHARS: usize = 24;

/// Outcome of validating one source text
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Source as given
    pub original: String,
    /// Lossless writer output
    pub lossless: String,
    /// Default writer output
    pub formatted: String,
    pub differences: Vec<RoundTripDifference>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// One line per difference
    pub fn issues(&self) -> Vec<String> {
        self.differences
            .iter()
            .map(|difference| match difference.offset {
                Some(offset) => format!("{} at offset {offset}", difference.description),
                None => difference.description.clone(),
            })
            .collect()
    }
}

/// A place where a round trip did not hold
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTripDifference {
    pub kind: DifferenceKind,
    /// Byte offset of the first differing character
    pub offset: Option<usize>,
    pub description: String,
    /// Text expected from the offset on
    pub expected: Option<String>,
    /// Text produced from the offset on
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceKind {
    /// Lossless output differs from the source
    TextDifference,
    /// Default output does not parse back to an equal tree
    StructuralDifference,
    /// Writing the re-parsed default output changes it again
    NotIdempotent,
}

/// Checks lossless and default-mode round trips
#[derive(Debug, Clone, Default)]
pub struct RoundTripValidator {
    source_kind: SourceKind,
    writer: WriterConfiguration,
}

impl RoundTripValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `.kts` scripts instead of files
    pub fn for_scripts() -> Self {
        Self {
            source_kind: SourceKind::Script,
            ..Self::default()
        }
    }

    /// Default-mode writer options to validate with; `extras` is ignored
    pub fn with_writer(mut self, writer: WriterConfiguration) -> Self {
        self.writer = WriterConfiguration {
            extras: false,
            ..writer
        };
        self
    }

    /// Fails only when the source itself cannot be parsed
    pub fn validate(&self, source: &str) -> Result<ValidationResult> {
        self.validate_source(None, source)
    }

    /// Like [`validate`](Self::validate), with `name` labelling parse diagnostics
    pub fn validate_named(&self, name: &str, source: &str) -> Result<ValidationResult> {
        self.validate_source(Some(name), source)
    }

    /// Validate every file in `paths`
    ///
    /// Files that do not parse, or that hold constructs the node model does
    /// not represent, are logged and left out. A file that cannot be read
    /// stops the batch.
    pub fn validate_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<(PathBuf, ValidationResult)>> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let source =
                fs::read_to_string(path).map_err(|error| KastError::io_error(path, error))?;
            let name = path.display().to_string();
            if let Some(result) = self.validate_named(&name, &source).recoverable()? {
                results.push((path.to_path_buf(), result));
            }
        }
        debug!(
            files = paths.len(),
            validated = results.len(),
            "Validated files"
        );
        Ok(results)
    }

    fn validate_source(&self, name: Option<&str>, source: &str) -> Result<ValidationResult> {
        let config = ParserConfiguration {
            source_kind: self.source_kind,
            lossless: true,
        };
        let parser = KastParser::new(config);
        let tree = match name {
            Some(name) => parser.parse_named(name, source)?,
            None => parser.parse(source)?,
        };
        let mut differences = Vec::new();

        let lossless = Writer::with_extras().write(&tree);
        if let Some(difference) =
            text_difference(DifferenceKind::TextDifference, source, &lossless)
        {
            differences.push(difference);
        }

        let writer = Writer::new(self.writer.clone());
        let formatted = writer.write(&tree);
        let plain = KastParser::new(ParserConfiguration {
            lossless: false,
            ..config
        });
        match plain.parse(&formatted) {
            Ok(reparsed) => {
                if reparsed != tree {
                    differences.push(RoundTripDifference {
                        kind: DifferenceKind::StructuralDifference,
                        offset: None,
                        description: "default output parses to a different tree".to_string(),
                        expected: None,
                        actual: None,
                    });
                }
                let rewritten = writer.write(&reparsed);
                if let Some(difference) =
                    text_difference(DifferenceKind::NotIdempotent, &formatted, &rewritten)
                {
                    differences.push(difference);
                }
            }
            Err(error) => differences.push(RoundTripDifference {
                kind: DifferenceKind::StructuralDifference,
                offset: error.diagnostics().first().map(|diagnostic| diagnostic.offset),
                description: format!("default output does not parse: {error}"),
                expected: None,
                actual: None,
            }),
        }

        debug!(
            bytes = source.len(),
            differences = differences.len(),
            "Validated round trip"
        );
        Ok(ValidationResult {
            is_valid: differences.is_empty(),
            original: source.to_string(),
            lossless,
            formatted,
            differences,
        })
    }
}

fn text_difference(
    kind: DifferenceKind,
    expected: &str,
    actual: &str,
) -> Option<RoundTripDifference> {
    let offset = first_difference(expected, actual)?;
    let description = match kind {
        DifferenceKind::TextDifference => "lossless output differs from the source",
        DifferenceKind::NotIdempotent => "default output changes when written again",
        DifferenceKind::StructuralDifference => "texts differ",
    };
    Some(RoundTripDifference {
        kind,
        offset: Some(offset),
        description: description.to_string(),
        expected: Some(context(expected, offset)),
        actual: Some(context(actual, offset)),
    })
}

/// Byte offset of the first differing character, `None` when equal
fn first_difference(expected: &str, actual: &str) -> Option<usize> {
    if expected == actual {
        return None;
    }
    let mismatch = expected
        .char_indices()
        .zip(actual.chars())
        .find(|((_, left), right)| left != right)
        .map(|((offset, _), _)| offset);
    Some(mismatch.unwrap_or_else(|| expected.len().min(actual.len())))
}

fn context(text: &str, offset: usize) -> String {
    text[offset..].chars().take(CONTEXT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_valid_source() {
        let source = "package demo\n\n// entry point\nfun main() {\n    println(\"hi\") ; /* done */\n}\n";
        let result = RoundTripValidator::new().validate(source).unwrap();
        assert!(result.is_valid(), "{:?}", result.issues());
        assert_eq!(result.lossless, source);
        assert!(result.differences.is_empty());
    }

    #[test]
    fn test_script_source() {
        let result = RoundTripValidator::for_scripts()
            .validate("val x = 1\nprintln(x)\n")
            .unwrap();
        assert!(result.is_valid(), "{:?}", result.issues());
    }

    #[test]
    fn test_invalid_source_is_an_error() {
        let error = RoundTripValidator::new().validate("fun (").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_validate_paths_skips_what_cannot_be_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("Good.kt");
        let broken = dir.path().join("Broken.kt");
        let unsupported = dir.path().join("Generic.kt");
        std::fs::write(&good, "fun main() {\n    println(1) // one\n}\n").unwrap();
        std::fs::write(&broken, "fun (").unwrap();
        std::fs::write(&unsupported, "fun f<T>() {}\n").unwrap();

        let results = RoundTripValidator::new()
            .validate_paths(&[&good, &broken, &unsupported])
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, good);
        assert!(results[0].1.is_valid(), "{:?}", results[0].1.issues());
    }

    #[test]
    fn test_validate_paths_stops_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = RoundTripValidator::new()
            .validate_paths(&[dir.path().join("Missing.kt")])
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_named_parse_errors_carry_the_name() {
        let error = RoundTripValidator::new()
            .validate_named("Broken.kt", "fun (")
            .unwrap_err();
        assert_eq!(error.diagnostics()[0].file.as_deref(), Some("Broken.kt"));
    }

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference("abc", "abc"), None);
        assert_eq!(first_difference("abc", "abd"), Some(2));
        assert_eq!(first_difference("ab", "abc"), Some(2));
        assert_eq!(first_difference("é1", "é2"), Some(2));
    }

    #[test]
    fn test_text_difference_context() {
        let difference =
            text_difference(DifferenceKind::TextDifference, "val x = 1", "val x=1").unwrap();
        assert_eq!(difference.offset, Some(5));
        assert_eq!(difference.expected.as_deref(), Some(" = 1"));
        assert_eq!(difference.actual.as_deref(), Some("=1"));
    }

    #[test]
    fn test_indent_size_is_kept() {
        let validator = RoundTripValidator::new().with_writer(WriterConfiguration {
            extras: true,
            indent_size: 2,
        });
        let result = validator.validate("fun f() {\n    g()\n}\n").unwrap();
        assert_eq!(result.formatted, "fun f() {\n  g()\n}\n");
        assert!(result.is_valid());
    }
}
