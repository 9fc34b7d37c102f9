//! Slack request signature verification.
//!
//! Implements the `v0` signing scheme: the platform sends a unix timestamp
//! in `X-Slack-Request-Timestamp` and `v0=<hex hmac>` in
//! `X-Slack-Signature`, where the HMAC-SHA256 is computed over
//! `v0:{timestamp}:{raw body}` with the app's signing secret. Verification
//! checks the timestamp window first so replayed requests are rejected
//! before any signature work.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Signing scheme version prefix on the signature header.
pub const SIGNATURE_VERSION: &str = "v0";

/// Maximum accepted age of a request in seconds (5 minutes).
const MAX_REQUEST_AGE_SECS: i64 = 300;

/// Maximum clock skew tolerance for future timestamps in seconds.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Errors that can occur during request verification.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Header or signature could not be parsed.
    #[error("signature parse error: {0}")]
    ParseError(String),

    /// Signature verification failed.
    #[error("invalid signature")]
    InvalidSignature,

    /// Timestamp is too old.
    #[error("timestamp outside of tolerance zone")]
    TimestampOutOfRange,

    /// Timestamp is too far in the future.
    #[error("invalid timestamp")]
    InvalidTimestamp,
}

/// Verifies that incoming webhooks were signed by the platform.
pub struct SlackRequestVerifier {
    signing_secret: String,
}

impl SlackRequestVerifier {
    /// Creates a new verifier with the given signing secret.
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
        }
    }

    /// Verifies a request against its signature headers.
    ///
    /// Verification process:
    /// 1. Parse the timestamp header
    /// 2. Validate the timestamp is within the tolerance window
    /// 3. Compute the expected signature over `v0:{timestamp}:{body}`
    /// 4. Compare with the provided signature (constant-time)
    pub fn verify(
        &self,
        timestamp_header: &str,
        signature_header: &str,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        // 1. Parse timestamp
        let timestamp: i64 = timestamp_header
            .trim()
            .parse()
            .map_err(|_| SignatureError::ParseError("timestamp is not an integer".to_string()))?;

        // 2. Validate timestamp window
        self.validate_timestamp(timestamp)?;

        // 3. Parse the provided signature
        let hex_signature = signature_header
            .trim()
            .strip_prefix(SIGNATURE_VERSION)
            .and_then(|rest| rest.strip_prefix('='))
            .ok_or_else(|| {
                SignatureError::ParseError(format!(
                    "signature missing '{}=' prefix",
                    SIGNATURE_VERSION
                ))
            })?;
        let provided = hex::decode(hex_signature)
            .map_err(|_| SignatureError::ParseError("signature is not valid hex".to_string()))?;

        // 4. Compare signatures in constant time
        let expected = self.compute_signature(timestamp, body);
        if !constant_time_compare(&expected, &provided) {
            return Err(SignatureError::InvalidSignature);
        }

        Ok(())
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64) -> Result<(), SignatureError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - timestamp;

        // Reject requests that are too old
        if age > MAX_REQUEST_AGE_SECS {
            return Err(SignatureError::TimestampOutOfRange);
        }

        // Reject requests from the future (with clock skew tolerance)
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(SignatureError::InvalidTimestamp);
        }

        Ok(())
    }

    /// Computes the HMAC-SHA256 signature for the given timestamp and body.
    fn compute_signature(&self, timestamp: i64, body: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key");
        mac.update(format!("{}:{}:", SIGNATURE_VERSION, timestamp).as_bytes());
        mac.update(body);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak information about the expected signature.
pub(crate) fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a full signature header value for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, body: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(format!("{}:{}:{}", SIGNATURE_VERSION, timestamp, body).as_bytes());
    format!(
        "{}={}",
        SIGNATURE_VERSION,
        hex::encode(mac.finalize().into_bytes())
    )
}
