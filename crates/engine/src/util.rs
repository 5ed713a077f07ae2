//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and key derivation so every lookup (parties, item facts) agrees
//! on what "the same name" means.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Names that always refer to the ledger owner.
pub(crate) const OWNER_ALIASES: [&str; 6] = ["me", "i", "myself", "user", "self", "you"];

/// Display form of a name: trimmed, inner whitespace collapsed.
pub(crate) fn normalize_display(value: &str, label: &str) -> ResultEngine<String> {
    let mut out = String::new();
    for token in value.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(out)
}

/// Lookup key of a name: NFKC folded, lowercased, whitespace collapsed.
pub(crate) fn normalize_key(value: &str, label: &str) -> ResultEngine<String> {
    let folded: String = value.nfkc().collect();
    let display = normalize_display(&folded, label)?;
    Ok(display.to_lowercase())
}

/// Returns `true` if the normalized key is one of the owner aliases.
pub(crate) fn is_owner_alias(key: &str) -> bool {
    OWNER_ALIASES.contains(&key)
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Reject zero, negative and oversized amounts before anything is written.
pub(crate) fn require_positive(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidInput(format!(
            "{label} amount must be > 0, got {amount}"
        )));
    }
    if amount > MoneyCents::MAX_ENTRY {
        return Err(EngineError::InvalidInput(format!(
            "{label} amount must be at most {}, got {amount}",
            MoneyCents::MAX_ENTRY
        )));
    }
    Ok(())
}
