//! Authorization decision for the lookup endpoint.

use std::sync::Arc;

use super::store::{load_or_create_secret, SecretStore};
use super::totp::{self, OtpSecret};

/// Authorization scheme prefix for one-time codes (case-sensitive).
pub const TOTP_SCHEME: &str = "TOTP ";

/// A refused request. Deliberately carries no detail about which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRejection;

impl AuthRejection {
    /// HTTP status to answer with.
    pub fn status(&self) -> u16 {
        401
    }

    pub fn message(&self) -> &'static str {
        "Authentication required."
    }
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AuthRejection {}

/// Decide whether a request may proceed.
///
/// Accepts when the host already authenticated the caller, or when the
/// `Authorization` header is `TOTP <code>` with a code valid at `now_secs`.
pub fn authorize(
    host_session_active: bool,
    authorization: Option<&str>,
    secret: &OtpSecret,
    now_secs: u64,
) -> Result<(), AuthRejection> {
    if host_session_active {
        return Ok(());
    }
    let code = totp_code(authorization).ok_or(AuthRejection)?;
    if totp::validate(secret.as_bytes(), code, now_secs) {
        Ok(())
    } else {
        Err(AuthRejection)
    }
}

/// Extract the trimmed code from a `TOTP <code>` header value.
fn totp_code(authorization: Option<&str>) -> Option<&str> {
    let rest = authorization?.strip_prefix(TOTP_SCHEME)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.trim())
}

/// Credential gate backed by a secret store.
///
/// The secret is only loaded (and created on first use) when a TOTP header
/// actually has to be checked.
#[derive(Clone)]
pub struct CredentialGate {
    store: Arc<dyn SecretStore>,
    secret_name: String,
}

impl CredentialGate {
    pub fn new(store: Arc<dyn SecretStore>, secret_name: impl Into<String>) -> Self {
        Self {
            store,
            secret_name: secret_name.into(),
        }
    }

    /// Authorize a request at the current wall-clock time.
    pub fn check(
        &self,
        host_session_active: bool,
        authorization: Option<&str>,
    ) -> Result<(), AuthRejection> {
        self.check_at(host_session_active, authorization, totp::unix_now())
    }

    /// Authorize a request at `now_secs`.
    pub fn check_at(
        &self,
        host_session_active: bool,
        authorization: Option<&str>,
        now_secs: u64,
    ) -> Result<(), AuthRejection> {
        if host_session_active {
            return Ok(());
        }
        if totp_code(authorization).is_none() {
            return Err(AuthRejection);
        }
        let secret = load_or_create_secret(self.store.as_ref(), &self.secret_name)
            .map_err(|e| {
                tracing::warn!("Cannot load TOTP secret: {e}");
                AuthRejection
            })?;
        authorize(false, authorization, &secret, now_secs)
    }

    /// Load the secret, creating it if needed.
    pub fn secret(&self) -> Result<OtpSecret, crate::error::SecretStoreError> {
        load_or_create_secret(self.store.as_ref(), &self.secret_name)
    }
}
