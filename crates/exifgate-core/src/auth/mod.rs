//! One-time-password authentication.
//!
//! - **base32**: RFC 4648 codec for secrets
//! - **totp**: code derivation and skew-tolerant validation
//! - **store**: secret persistence with atomic get-or-create
//! - **gate**: the accept/reject decision for the lookup endpoint

pub mod base32;
pub mod gate;
pub mod store;
pub mod totp;

pub use gate::{authorize, AuthRejection, CredentialGate, TOTP_SCHEME};
pub use store::{load_or_create_secret, FileSecretStore, MemorySecretStore, SecretStore};
pub use totp::{current_code, time_step, unix_now, validate, OtpSecret};
