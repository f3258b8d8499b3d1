//! Degrees/minutes/seconds to signed decimal degrees.

use super::rational::parse_rational;
use crate::types::RawValue;

/// Convert a DMS triple plus hemisphere reference into decimal degrees.
///
/// The triple must hold exactly three elements, each a rational string or an
/// integer. Southern and western hemispheres (`S`/`W`, any case) are
/// negative. The result is rounded to 6 decimal places.
pub fn to_decimal_degrees(dms: &[RawValue], hemisphere: &str) -> Option<f64> {
    let [degrees, minutes, seconds] = dms else {
        return None;
    };
    let degrees = component(degrees)?;
    let minutes = component(minutes)?;
    let seconds = component(seconds)?;

    let mut decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    if matches!(hemisphere.trim().to_ascii_uppercase().as_str(), "S" | "W") {
        decimal = -decimal;
    }
    Some(round_to(decimal, 6))
}

fn component(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Str(s) => parse_rational(s),
        RawValue::Int(n) => Some(*n as f64),
        _ => None,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dms(parts: &[&str]) -> Vec<RawValue> {
        parts.iter().map(|p| RawValue::from(*p)).collect()
    }

    #[test]
    fn test_north_is_positive() {
        let lat = to_decimal_degrees(&dms(&["48/1", "51/1", "30/1"]), "N").unwrap();
        assert!((lat - 48.858333).abs() < 1e-4);
    }

    #[test]
    fn test_south_and_west_are_negative() {
        let coords = dms(&["48/1", "51/1", "30/1"]);
        let south = to_decimal_degrees(&coords, "S").unwrap();
        let west = to_decimal_degrees(&coords, "w").unwrap();
        assert!((south + 48.858333).abs() < 1e-4);
        assert_eq!(south, west);
    }

    #[test]
    fn test_rounded_to_six_places() {
        let lat = to_decimal_degrees(&dms(&["48/1", "51/1", "30/1"]), "N").unwrap();
        assert_eq!(lat, 48.858333);
        let scaled = lat * 1e6;
        assert!((scaled - scaled.round()).abs() < 1e-6);
    }

    #[test]
    fn test_fractional_seconds() {
        let lon = to_decimal_degrees(&dms(&["2/1", "17/1", "4012/100"]), "E").unwrap();
        assert_eq!(lon, 2.294478);
    }

    #[test]
    fn test_integer_components() {
        let coords = vec![RawValue::Int(10), RawValue::Int(30), RawValue::Int(0)];
        assert_eq!(to_decimal_degrees(&coords, "N"), Some(10.5));
    }

    #[test]
    fn test_short_triple_is_unparseable() {
        assert_eq!(to_decimal_degrees(&dms(&["48/1", "51/1"]), "N"), None);
        assert_eq!(to_decimal_degrees(&[], "N"), None);
    }

    #[test]
    fn test_bad_component_is_unparseable() {
        assert_eq!(to_decimal_degrees(&dms(&["48/1", "51/0", "30/1"]), "N"), None);
        assert_eq!(to_decimal_degrees(&dms(&["48/1", "abc", "30/1"]), "N"), None);
    }
}
