//! Time-based one-time passwords (RFC 6238 over RFC 4226, HMAC-SHA1).

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::{Choice, ConstantTimeEq};

use super::base32;

type HmacSha1 = Hmac<Sha1>;

/// Length of a time step in seconds.
pub const STEP_SECONDS: u64 = 30;

/// Number of digits in a code.
pub const DIGITS: usize = 6;

/// Size of a freshly generated secret in bytes.
pub const SECRET_LEN: usize = 20;

/// Accepted drift, in steps, on either side of the current one.
const SKEW_STEPS: i64 = 1;

/// Shared TOTP secret bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpSecret(Vec<u8>);

impl OtpSecret {
    /// Generate a new random secret from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode a base32-encoded secret. Returns `None` if it decodes to fewer
    /// than [`SECRET_LEN`] bytes.
    pub fn from_base32(text: &str) -> Option<Self> {
        let bytes = base32::decode(text);
        (bytes.len() >= SECRET_LEN).then_some(Self(bytes))
    }

    pub fn to_base32(&self) -> String {
        base32::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `otpauth://` URI for enrolling the secret in an authenticator app.
    pub fn provisioning_uri(&self, issuer: &str, account: &str) -> String {
        format!(
            "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}&algorithm=SHA1&digits={DIGITS}&period={STEP_SECONDS}",
            issuer = uri_escape(issuer),
            account = uri_escape(account),
            secret = self.to_base32(),
        )
    }
}

impl std::fmt::Debug for OtpSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpSecret")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

fn uri_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for b in text.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Time step containing `unix_secs`.
pub fn time_step(unix_secs: u64) -> u64 {
    unix_secs / STEP_SECONDS
}

/// Derive the 6-digit code for `secret` at time step `step`.
pub fn current_code(secret: &[u8], step: u64) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(&step.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = usize::from(digest[digest.len() - 1] & 0x0F);
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7F,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    format!("{:0width$}", binary % 1_000_000, width = DIGITS)
}

/// Check `code` against the steps around `now_secs`.
///
/// Accepts codes for the previous, current and next step. Every candidate is
/// compared in constant time and all of them are always evaluated.
pub fn validate(secret: &[u8], code: &str, now_secs: u64) -> bool {
    let supplied = code.as_bytes();
    if supplied.len() != DIGITS {
        return false;
    }

    let step = time_step(now_secs);
    let mut matched = Choice::from(0);
    for skew in -SKEW_STEPS..=SKEW_STEPS {
        let Some(candidate_step) = step.checked_add_signed(skew) else {
            continue;
        };
        let expected = current_code(secret, candidate_step);
        matched |= expected.as_bytes().ct_eq(supplied);
    }
    bool::from(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 6238 appendix B shared secret for SHA-1
    const RFC_SECRET: &[u8] = b"12345678901234567890";

    #[test]
    fn test_rfc6238_vectors() {
        // The RFC lists 8-digit codes; these are their last 6 digits.
        assert_eq!(current_code(RFC_SECRET, time_step(59)), "287082");
        assert_eq!(current_code(RFC_SECRET, time_step(1_111_111_109)), "081804");
        assert_eq!(current_code(RFC_SECRET, time_step(1_111_111_111)), "050471");
        assert_eq!(current_code(RFC_SECRET, time_step(1_234_567_890)), "005924");
        assert_eq!(current_code(RFC_SECRET, time_step(2_000_000_000)), "279037");
    }

    #[test]
    fn test_rfc4226_counter_vectors() {
        let expected = ["755224", "287082", "359152", "969429", "338314"];
        for (counter, code) in expected.iter().enumerate() {
            assert_eq!(current_code(RFC_SECRET, counter as u64), *code);
        }
    }

    #[test]
    fn test_code_is_six_digits() {
        let secret = OtpSecret::generate();
        for step in 0..50 {
            let code = current_code(secret.as_bytes(), step);
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_validate_accepts_adjacent_steps() {
        let now = 1_700_000_015;
        let step = time_step(now);
        for candidate in [step - 1, step, step + 1] {
            let code = current_code(RFC_SECRET, candidate);
            assert!(validate(RFC_SECRET, &code, now), "step {candidate}");
        }
    }

    #[test]
    fn test_validate_rejects_distant_steps() {
        let now = 1_700_000_015;
        let step = time_step(now);
        for candidate in [step - 2, step + 2] {
            let code = current_code(RFC_SECRET, candidate);
            // Guard against an accidental collision with an accepted code
            let accepted: Vec<String> = (step - 1..=step + 1)
                .map(|s| current_code(RFC_SECRET, s))
                .collect();
            if !accepted.contains(&code) {
                assert!(!validate(RFC_SECRET, &code, now), "step {candidate}");
            }
        }
    }

    #[test]
    fn test_validate_rejects_wrong_code() {
        let now = 1_700_000_015;
        let step = time_step(now);
        let accepted: Vec<String> = (step - 1..=step + 1)
            .map(|s| current_code(RFC_SECRET, s))
            .collect();
        let wrong = (0..1_000_000u32)
            .map(|n| format!("{n:06}"))
            .find(|c| !accepted.contains(c))
            .unwrap();
        assert!(!validate(RFC_SECRET, &wrong, now));
        assert!(!validate(RFC_SECRET, "", now));
        assert!(!validate(RFC_SECRET, "12345", now));
        assert!(!validate(RFC_SECRET, "1234567", now));
    }

    #[test]
    fn test_validate_at_epoch_skips_negative_step() {
        let code = current_code(RFC_SECRET, 0);
        assert!(validate(RFC_SECRET, &code, 0));
    }

    #[test]
    fn test_secret_base32_round_trip() {
        let secret = OtpSecret::generate();
        assert_eq!(secret.as_bytes().len(), SECRET_LEN);
        let restored = OtpSecret::from_base32(&secret.to_base32()).unwrap();
        assert_eq!(restored, secret);
        assert!(OtpSecret::from_base32("===").is_none());
        // Truncated secrets are refused rather than used as short keys
        assert!(OtpSecret::from_base32("MY").is_none());
        assert!(OtpSecret::from_base32(&restored.to_base32()[..8]).is_none());
    }

    #[test]
    fn test_generated_secrets_differ() {
        assert_ne!(OtpSecret::generate(), OtpSecret::generate());
    }

    #[test]
    fn test_provisioning_uri() {
        let secret = OtpSecret::from_bytes(b"foobar".to_vec());
        let uri = secret.provisioning_uri("exif gate", "admin@example.com");
        assert_eq!(
            uri,
            "otpauth://totp/exif%20gate:admin%40example.com?secret=MZXW6YTBOI&issuer=exif%20gate&algorithm=SHA1&digits=6&period=30"
        );
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let secret = OtpSecret::from_bytes(b"foobar".to_vec());
        let debug = format!("{secret:?}");
        assert!(!debug.contains("foobar"));
        assert!(!debug.contains("MZXW6YTBOI"));
    }
}
