//! Core data types for exifgate.
//!
//! A lookup moves a [`RawRecord`] (what the extractor found, loosely typed)
//! to a [`NormalizedRecord`] (clean, JSON-safe), and wraps the outcome in a
//! [`LookupResponse`] envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LookupResult;

/// A metadata value as produced by the extractor, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Int(i64),
    /// Text as found in the file; may be a rational (`"72/1"`), a timestamp,
    /// or undecoded binary.
    Str(String),
    List(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Borrow the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Field name → raw value, as handed over by a metadata extractor.
pub type RawRecord = BTreeMap<String, RawValue>;

/// A canonicalized metadata value.
///
/// Serializes to plain JSON: numbers, strings, arrays and objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalValue {
    /// A container element that was discarded during sanitization.
    /// Never appears as a top-level record value.
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<CanonicalValue>),
    Map(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CanonicalValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CanonicalValue::Float(f) => Some(*f),
            CanonicalValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

/// Field name → canonical value. Every entry holds a real value.
pub type NormalizedRecord = BTreeMap<String, CanonicalValue>;

/// Payload of a [`LookupResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Record(NormalizedRecord),
    Message(String),
}

/// The `{ success, data }` envelope returned for every lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    pub data: ResponseData,
}

impl LookupResponse {
    /// Successful lookup carrying the normalized record.
    pub fn ok(record: NormalizedRecord) -> Self {
        Self {
            success: true,
            data: ResponseData::Record(record),
        }
    }

    /// Failed lookup carrying a human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: ResponseData::Message(message.into()),
        }
    }
}

impl From<LookupResult<NormalizedRecord>> for LookupResponse {
    fn from(result: LookupResult<NormalizedRecord>) -> Self {
        match result {
            Ok(record) => Self::ok(record),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;

    #[test]
    fn test_canonical_value_serializes_untagged() {
        let mut record = NormalizedRecord::new();
        record.insert("ISO".into(), CanonicalValue::Int(200));
        record.insert("FNumber".into(), CanonicalValue::Float(1.8));
        record.insert(
            "GPSVersionID".into(),
            CanonicalValue::List(vec![CanonicalValue::Int(2), CanonicalValue::Null]),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"FNumber":1.8,"GPSVersionID":[2,null],"ISO":200}"#);
    }

    #[test]
    fn test_record_survives_json_round_trip() {
        let mut record = NormalizedRecord::new();
        record.insert("XResolution".into(), CanonicalValue::Float(72.0));
        record.insert("Make".into(), CanonicalValue::Str("Canon".into()));
        let json = serde_json::to_string(&record).unwrap();
        let back: NormalizedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_envelope_shapes() {
        let ok = LookupResponse::ok(NormalizedRecord::new());
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"success":true,"data":{}}"#
        );

        let err = LookupResponse::from(Err(LookupError::ExifNotFound));
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"success":false,"data":"EXIF Not Found for image"}"#
        );
    }

    #[test]
    fn test_raw_value_conversions() {
        let v: RawValue = vec!["48/1", "51/1", "30/1"].into();
        assert_eq!(
            v,
            RawValue::List(vec![
                RawValue::Str("48/1".into()),
                RawValue::Str("51/1".into()),
                RawValue::Str("30/1".into()),
            ])
        );
        assert_eq!(RawValue::from(1i64).as_int(), Some(1));
        assert_eq!(RawValue::from("N").as_str(), Some("N"));
    }
}
