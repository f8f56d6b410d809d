//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage or user input and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| EngineError::Validation(format!("invalid {label} id: {value}")))
}

/// NFC + lowercase, without trimming. Used for case-insensitive comparisons
/// where composed and decomposed accents must compare equal.
pub(crate) fn fold_case(value: &str) -> String {
    value.nfc().collect::<String>().to_lowercase()
}

/// Key used for uniqueness checks on names.
pub(crate) fn normalize_name(value: &str) -> String {
    fold_case(value.trim())
}

pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_case_unifies_composed_and_decomposed_accents() {
        assert_eq!(fold_case("JOSE\u{301}"), fold_case("josé"));
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" a ")), Some("a".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }
}
