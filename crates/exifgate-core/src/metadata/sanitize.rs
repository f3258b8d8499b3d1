//! Canonicalization of individual metadata values.

use regex::Regex;
use std::sync::LazyLock;

use super::rational::parse_rational;
use crate::types::{CanonicalValue, RawValue};

static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?/\d+(\.\d+)?$").expect("valid fraction regex"));

static EXIF_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}):(\d{2}):(\d{2}) (\d{2}:\d{2}:\d{2})$").expect("valid timestamp regex")
});

/// Canonicalize one raw value.
///
/// Returns `None` when the value must not be surfaced: strings carrying
/// control characters (binary data) and strings that are blank after
/// trimming. Containers are never dropped; a discarded element keeps its
/// position as [`CanonicalValue::Null`].
pub fn sanitize(value: &RawValue) -> Option<CanonicalValue> {
    match value {
        RawValue::Int(n) => Some(CanonicalValue::Int(*n)),
        RawValue::Str(s) => sanitize_str(s),
        RawValue::List(items) => Some(CanonicalValue::List(
            items.iter().map(sanitize_or_null).collect(),
        )),
        RawValue::Map(entries) => Some(CanonicalValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), sanitize_or_null(v)))
                .collect(),
        )),
    }
}

fn sanitize_or_null(value: &RawValue) -> CanonicalValue {
    sanitize(value).unwrap_or(CanonicalValue::Null)
}

fn sanitize_str(s: &str) -> Option<CanonicalValue> {
    if s.bytes().any(|b| b < 0x20) {
        return None;
    }
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_fraction(trimmed) {
        return parse_rational(trimmed).map(CanonicalValue::Float);
    }
    if let Some(iso) = exif_timestamp_to_iso(trimmed) {
        return Some(CanonicalValue::Str(iso));
    }
    Some(CanonicalValue::Str(trimmed.to_string()))
}

/// Whether `s` is an unsigned decimal fraction such as `"72/1"` or `"2.8/1"`.
pub(crate) fn is_fraction(s: &str) -> bool {
    FRACTION.is_match(s)
}

/// Rewrite `YYYY:MM:DD HH:MM:SS` to `YYYY-MM-DDTHH:MM:SS`.
///
/// Purely textual; `2024:13:40 99:00:00` is rewritten, not rejected.
fn exif_timestamp_to_iso(s: &str) -> Option<String> {
    let caps = EXIF_TIMESTAMP.captures(s)?;
    Some(format!("{}-{}-{}T{}", &caps[1], &caps[2], &caps[3], &caps[4]))
}
