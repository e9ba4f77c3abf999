//! Rowan language implementation for Kotlin
//!
//! This module implements the `rowan::Language` trait, which connects
//! [`KtSyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::KtSyntaxKind;

/// Language marker for the Kotlin CST
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KtLanguage;

impl Language for KtLanguage {
    type Kind = KtSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match KtSyntaxKind::from_raw(raw.0) {
            Some(kind) => kind,
            None => {
                tracing::warn!("Unknown syntax kind: {}", raw.0);
                KtSyntaxKind::Error
            }
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        let kinds = [
            KtSyntaxKind::Whitespace,
            KtSyntaxKind::FunKw,
            KtSyntaxKind::Ident,
            KtSyntaxKind::Colon,
            KtSyntaxKind::KtFile,
            KtSyntaxKind::CallExpression,
        ];

        for &kind in &kinds {
            let raw = KtLanguage::kind_to_raw(kind);
            let back = KtLanguage::kind_from_raw(raw);
            assert_eq!(kind, back, "Roundtrip failed for {kind:?}");
        }
    }

    #[test]
    fn test_unknown_raw_kind_maps_to_error() {
        assert_eq!(
            KtLanguage::kind_from_raw(rowan::SyntaxKind(u16::MAX)),
            KtSyntaxKind::Error
        );
    }
}
