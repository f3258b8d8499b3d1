//! Metadata canonicalization pipeline.
//!
//! - **rational**: `"N/D"` strings to floats
//! - **gps**: DMS triples to decimal degrees
//! - **sanitize**: one raw value to its canonical form
//! - **normalize**: a whole record, plus derived GPS and capture-time fields

pub mod gps;
pub mod normalize;
pub mod rational;
pub mod sanitize;

pub use gps::to_decimal_degrees;
pub use normalize::{
    normalize, CAPTURED_AT, GPS_DECIMAL_ALTITUDE, GPS_DECIMAL_LATITUDE, GPS_DECIMAL_LONGITUDE,
};
pub use rational::parse_rational;
pub use sanitize::sanitize;
