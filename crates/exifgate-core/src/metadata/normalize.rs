//! Whole-record normalization with derived GPS and capture-time fields.

use super::gps::to_decimal_degrees;
use super::rational::parse_rational;
use super::sanitize::{is_fraction, sanitize};
use crate::types::{CanonicalValue, NormalizedRecord, RawRecord, RawValue};

/// Derived field: signed decimal latitude.
pub const GPS_DECIMAL_LATITUDE: &str = "GPSDecimalLatitude";
/// Derived field: signed decimal longitude.
pub const GPS_DECIMAL_LONGITUDE: &str = "GPSDecimalLongitude";
/// Derived field: signed altitude in meters.
pub const GPS_DECIMAL_ALTITUDE: &str = "GPSDecimalAltitude";
/// Derived field: ISO 8601 capture time.
pub const CAPTURED_AT: &str = "CapturedAt";

/// Capture-time sources, highest priority first.
const CAPTURE_TIME_FIELDS: [&str; 3] = ["DateTimeOriginal", "DateTimeDigitized", "DateTime"];

/// Normalize a raw record into a clean, JSON-safe record.
///
/// Pure and deterministic. Derived GPS fields are computed from the raw
/// rational strings, so no precision is lost to the float conversion the
/// sanitizer applies to the same fields.
pub fn normalize(raw: &RawRecord) -> NormalizedRecord {
    let mut record: NormalizedRecord = raw
        .iter()
        .filter_map(|(key, value)| sanitize(value).map(|v| (key.clone(), v)))
        .collect();

    if let Some((lat, lon)) = decimal_position(raw) {
        record.insert(GPS_DECIMAL_LATITUDE.into(), CanonicalValue::Float(lat));
        record.insert(GPS_DECIMAL_LONGITUDE.into(), CanonicalValue::Float(lon));
    }

    if let Some(altitude) = decimal_altitude(raw) {
        record.insert(GPS_DECIMAL_ALTITUDE.into(), CanonicalValue::Float(altitude));
    }

    if let Some(captured_at) = capture_time(&record) {
        record.insert(CAPTURED_AT.into(), CanonicalValue::Str(captured_at));
    }

    tracing::trace!(fields = record.len(), raw_fields = raw.len(), "Normalized record");
    record
}

/// Latitude and longitude, only when both convert.
fn decimal_position(raw: &RawRecord) -> Option<(f64, f64)> {
    let lat = coordinate(raw, "GPSLatitude", "GPSLatitudeRef")?;
    let lon = coordinate(raw, "GPSLongitude", "GPSLongitudeRef")?;
    Some((lat, lon))
}

fn coordinate(raw: &RawRecord, field: &str, ref_field: &str) -> Option<f64> {
    let dms: Vec<RawValue> = match raw.get(field)? {
        RawValue::List(items) => items.clone(),
        // Keyed triples are read in key order
        RawValue::Map(entries) => entries.values().cloned().collect(),
        _ => return None,
    };
    let hemisphere = raw.get(ref_field)?.as_str()?;
    to_decimal_degrees(&dms, hemisphere)
}

/// Altitude in meters; `GPSAltitudeRef == 1` means below sea level.
fn decimal_altitude(raw: &RawRecord) -> Option<f64> {
    let text = raw.get("GPSAltitude")?.as_str()?.trim();
    if !is_fraction(text) {
        return None;
    }
    let altitude = parse_rational(text)?;
    let below_sea_level = raw
        .get("GPSAltitudeRef")
        .and_then(RawValue::as_int)
        .unwrap_or(0)
        == 1;
    Some(if below_sea_level { -altitude } else { altitude })
}

fn capture_time(record: &NormalizedRecord) -> Option<String> {
    CAPTURE_TIME_FIELDS
        .iter()
        .find_map(|field| record.get(*field).and_then(CanonicalValue::as_str))
        .map(str::to_string)
}
