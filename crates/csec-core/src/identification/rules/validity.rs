//! Rejects candidate values that belong to neighbouring rows.

use super::patterns::{CC_TOKENS, EXCLUDE_NEARBY};

/// Whether `value` cannot be an evaluation facility name.
///
/// Empty strings, Common Criteria component tokens and text from adjacent
/// identification rows are all rejected.
pub fn is_bad_value(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if CC_TOKENS.is_match(value) {
        return true;
    }
    EXCLUDE_NEARBY.iter().any(|re| re.is_match(value))
}

pub fn is_valid_value(value: &str) -> bool {
    !is_bad_value(value)
}
