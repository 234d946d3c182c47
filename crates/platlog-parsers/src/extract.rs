//! Field extractors
//!
//! Pure conversions from a captured substring to a typed value. Unit suffixes
//! such as `ms` or `MB` are consumed by the template, never passed in here.

use crate::error::{MatchError, MatchResult};

/// Literal accepted in place of a numeric Lambda version
pub const LATEST: &str = "$LATEST";

/// Parse an optionally signed run of ASCII digits
pub fn integer(field: &'static str, text: &str) -> MatchResult<i64> {
    if !is_digits(unsigned(text)) {
        return Err(MatchError::conversion(field, text));
    }
    // Lexically valid but may still overflow
    text.parse().map_err(|_| MatchError::conversion(field, text))
}

/// Parse digits with at most one decimal point, e.g. `7.80` or `100`
pub fn decimal(field: &'static str, text: &str) -> MatchResult<f64> {
    let body = unsigned(text);
    let valid = match body.split_once('.') {
        Some((whole, frac)) => is_digits(whole) && is_digits(frac),
        None => is_digits(body),
    };
    if !valid {
        return Err(MatchError::conversion(field, text));
    }
    text.parse().map_err(|_| MatchError::conversion(field, text))
}

/// Accept `$LATEST` or a run of digits, keeping the original text
pub fn version(field: &'static str, text: &str) -> MatchResult<String> {
    if text == LATEST || is_digits(text) {
        Ok(text.to_string())
    } else {
        Err(MatchError::conversion(field, text))
    }
}

fn unsigned(text: &str) -> &str {
    text.strip_prefix(['+', '-']).unwrap_or(text)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
