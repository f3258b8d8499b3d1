//! EXIF extraction from image bytes.

use exif::{Field, In, Reader, Value};
use std::io::Cursor;

use crate::types::{RawRecord, RawValue};

/// No usable metadata in the image. Decoder diagnostics are not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

/// Turns image bytes into a raw metadata record.
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<RawRecord, NotFound>;
}

/// Reads EXIF from JPEG, TIFF, HEIF, PNG and WebP containers.
///
/// Values are flattened the way loosely-typed EXIF readers present them:
/// numbers as integers, rationals as `"num/denom"` strings, text and
/// undefined blobs as strings, multi-valued fields as lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifExtractor;

impl ExifExtractor {
    pub fn new() -> Self {
        Self
    }

    fn convert(value: &Value) -> Option<RawValue> {
        match value {
            Value::Byte(v) => collapse(v.iter().map(|&n| RawValue::Int(n.into()))),
            Value::Short(v) => collapse(v.iter().map(|&n| RawValue::Int(n.into()))),
            Value::Long(v) => collapse(v.iter().map(|&n| RawValue::Int(n.into()))),
            Value::SByte(v) => collapse(v.iter().map(|&n| RawValue::Int(n.into()))),
            Value::SShort(v) => collapse(v.iter().map(|&n| RawValue::Int(n.into()))),
            Value::SLong(v) => collapse(v.iter().map(|&n| RawValue::Int(n.into()))),
            Value::Rational(v) => {
                collapse(v.iter().map(|r| RawValue::Str(format!("{}/{}", r.num, r.denom))))
            }
            Value::SRational(v) => {
                collapse(v.iter().map(|r| RawValue::Str(format!("{}/{}", r.num, r.denom))))
            }
            Value::Float(v) => collapse(v.iter().map(|f| RawValue::Str(f.to_string()))),
            Value::Double(v) => collapse(v.iter().map(|f| RawValue::Str(f.to_string()))),
            Value::Ascii(v) => collapse(
                v.iter()
                    .map(|s| RawValue::Str(String::from_utf8_lossy(s).into_owned())),
            ),
            Value::Undefined(bytes, _) => {
                Some(RawValue::Str(String::from_utf8_lossy(bytes).into_owned()))
            }
            Value::Unknown(..) => None,
        }
    }

    fn insert(record: &mut RawRecord, field: &Field) {
        if field.ifd_num != In::PRIMARY {
            return;
        }
        if let Some(value) = Self::convert(&field.value) {
            record.entry(field.tag.to_string()).or_insert(value);
        }
    }
}

/// A single value stays scalar; several become a list; none is dropped.
fn collapse(values: impl Iterator<Item = RawValue>) -> Option<RawValue> {
    let mut values: Vec<RawValue> = values.collect();
    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(RawValue::List(values)),
    }
}

impl MetadataExtractor for ExifExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<RawRecord, NotFound> {
        let exif = Reader::new()
            .read_from_container(&mut Cursor::new(bytes))
            .map_err(|e| {
                tracing::debug!("EXIF decode failed: {e}");
                NotFound
            })?;

        let mut record = RawRecord::new();
        for field in exif.fields() {
            Self::insert(&mut record, field);
        }

        if record.is_empty() {
            return Err(NotFound);
        }
        Ok(record)
    }
}
