//! Retry policy for transient fetch failures.
//!
//! Provides classification of retryable errors and exponential backoff.

use crate::error::FetchError;
use std::time::Duration;

/// Determine whether a fetch error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx), and
/// connection failures. Everything else (4xx, empty body, size limit, bad
/// URL) will fail the same way again.
pub fn is_retryable(error: &FetchError) -> bool {
    match error {
        FetchError::Timeout { .. } => true,
        FetchError::Status(code) => *code == 429 || (500..=599).contains(code),
        FetchError::Transport(message) => {
            message.contains("timed out") || message.contains("connect")
        }
        FetchError::EmptyBody | FetchError::TooLarge { .. } | FetchError::InvalidUrl(_) => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}
