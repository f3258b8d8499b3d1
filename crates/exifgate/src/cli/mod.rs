//! Command handlers for the `exifgate` binary.

pub mod config;
pub mod lookup;
pub mod otp;
pub mod serve;
