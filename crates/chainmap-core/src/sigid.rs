//! Signature identifier normalization.
//!
//! The source inventory reports site codes as six characters (`abc123`,
//! case-insensitive) while the target map stores them as `ABC-123`. The two
//! fixed patterns below are the only validation rule; anything that matches
//! neither is treated as unresolvable, never as an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder the source emits for signatures that have not been identified.
pub const UNKNOWN_CODE: &str = "???";

static MAP_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}-\d{3}$").expect("static pattern"));

static SOURCE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}\d{3}$").expect("static pattern"));

/// Normalizes a site code into the target map's `AAA-999` form.
///
/// Returns `None` for a missing or empty code, the `???` placeholder, and
/// any input matching neither fixed pattern. Codes already in map form pass
/// through unchanged.
pub fn normalize(code: Option<&str>) -> Option<String> {
    let code = code?;
    if code.is_empty() || code == UNKNOWN_CODE {
        return None;
    }
    if MAP_FORMAT.is_match(code) {
        return Some(code.to_string());
    }
    if SOURCE_FORMAT.is_match(code) {
        let (letters, digits) = code.split_at(3);
        return Some(format!("{}-{}", letters.to_ascii_uppercase(), digits));
    }
    None
}
