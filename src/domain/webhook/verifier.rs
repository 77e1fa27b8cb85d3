//! Webhook signature verification.
//!
//! Verifies the `Stripe-Signature` header with HMAC-SHA256 over the raw
//! request body, with a timestamp window to reject replays. The body is
//! never parsed until the signature has checked out.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;
use super::event::BillingEvent;

/// Oldest event age accepted (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Tolerated clock skew for timestamps from the future (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components of a `Stripe-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp the signature was generated at.
    pub timestamp: i64,
    /// The v1 (HMAC-SHA256) signature bytes.
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses a header of the form `t=<timestamp>,v1=<hex>[,v0=...]`.
    ///
    /// Unknown scheme fields are ignored for forward compatibility; the
    /// legacy v0 scheme is never checked.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::Parse("invalid signature header".to_string()))?;

            match key {
                "t" => {
                    timestamp = Some(
                        value
                            .parse()
                            .map_err(|_| WebhookError::Parse("invalid timestamp".to_string()))?,
                    );
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value).map_err(|_| {
                        WebhookError::Parse("invalid v1 signature hex".to_string())
                    })?);
                }
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::Parse("missing timestamp".to_string()))?;
        let v1_signature = v1_signature
            .ok_or_else(|| WebhookError::Parse("missing v1 signature".to_string()))?;

        Ok(SignatureHeader {
            timestamp,
            v1_signature,
        })
    }
}

/// Verifies billing webhook signatures against a shared signing secret.
pub struct WebhookVerifier {
    secret: String,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies the signature and parses the payload into an event.
    ///
    /// # Errors
    ///
    /// - `Parse` for a malformed header, and for a payload that verifies
    ///   but is not a valid event
    /// - `StaleTimestamp` / `FutureTimestamp` for replays
    /// - `InvalidSignature` when the HMAC does not match
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<BillingEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp)?;

        let expected = self.compute_signature(header.timestamp, payload);
        if !constant_time_compare(&expected, &header.v1_signature) {
            return Err(WebhookError::InvalidSignature);
        }

        let event: BillingEvent =
            serde_json::from_slice(payload).map_err(|e| WebhookError::Parse(e.to_string()))?;

        Ok(event)
    }

    fn validate_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - timestamp;

        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::StaleTimestamp);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::FutureTimestamp);
        }
        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));

        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key");
        mac.update(signed_payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time byte comparison, to avoid leaking signature prefixes
/// through timing.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a valid hex signature for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(signed_payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";

    // ══════════════════════════════════════════════════════════════
    // Header parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_v1_only() {
        let header_str = format!("t=1234567890,v1={}", "a".repeat(64));
        let header = SignatureHeader::parse(&header_str).unwrap();
        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signature.len(), 32);
    }

    #[test]
    fn parse_header_ignores_v0_and_unknown_fields() {
        let header_str = format!("t=1234567890,v1={},v0={},scheme=hmac", "a".repeat(64), "b".repeat(64));
        let header = SignatureHeader::parse(&header_str).unwrap();
        assert_eq!(header.timestamp, 1234567890);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::Parse(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890");
        assert!(matches!(result, Err(WebhookError::Parse(_))));
    }

    #[test]
    fn parse_header_bad_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("t=soon,v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::Parse(_))));
    }

    #[test]
    fn parse_header_bad_hex_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=not_hex");
        assert!(matches!(result, Err(WebhookError::Parse(_))));
    }

    #[test]
    fn parse_header_no_equals_fails() {
        let result = SignatureHeader::parse("t1234567890");
        assert!(matches!(result, Err(WebhookError::Parse(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Signature verification
    // ══════════════════════════════════════════════════════════════

    fn event_payload() -> String {
        serde_json::json!({
            "id": "evt_verify_1",
            "type": "customer.subscription.updated",
            "created": 1704067200,
            "data": { "object": { "id": "sub_1", "status": "active" } },
            "livemode": false
        })
        .to_string()
    }

    #[test]
    fn verify_valid_signature() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let payload = event_payload();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(TEST_SECRET, timestamp, &payload);
        let header = format!("t={},v1={}", timestamp, signature);

        let event = verifier.verify_and_parse(payload.as_bytes(), &header).unwrap();
        assert_eq!(event.id, "evt_verify_1");
    }

    #[test]
    fn verify_forged_signature_fails() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let payload = event_payload();
        let timestamp = chrono::Utc::now().timestamp();
        let header = format!("t={},v1={}", timestamp, "a".repeat(64));

        let result = verifier.verify_and_parse(payload.as_bytes(), &header);
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let verifier = WebhookVerifier::new("whsec_other");
        let payload = event_payload();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(TEST_SECRET, timestamp, &payload);
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verifier.verify_and_parse(payload.as_bytes(), &header);
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let payload = event_payload();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(TEST_SECRET, timestamp, &payload);
        let header = format!("t={},v1={}", timestamp, signature);

        let tampered = payload.replace("sub_1", "sub_evil");
        let result = verifier.verify_and_parse(tampered.as_bytes(), &header);
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    // ══════════════════════════════════════════════════════════════
    // Timestamp window
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn timestamp_within_window_ok() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp() - 120;
        assert!(verifier.validate_timestamp(timestamp).is_ok());
    }

    #[test]
    fn timestamp_at_boundary_ok() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp() - 300;
        assert!(verifier.validate_timestamp(timestamp).is_ok());
    }

    #[test]
    fn timestamp_past_boundary_is_stale() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp() - 301;
        assert!(matches!(
            verifier.validate_timestamp(timestamp),
            Err(WebhookError::StaleTimestamp)
        ));
    }

    #[test]
    fn timestamp_future_within_skew_ok() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp() + 30;
        assert!(verifier.validate_timestamp(timestamp).is_ok());
    }

    #[test]
    fn timestamp_future_beyond_skew_fails() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp() + 120;
        assert!(matches!(
            verifier.validate_timestamp(timestamp),
            Err(WebhookError::FutureTimestamp)
        ));
    }

    // ══════════════════════════════════════════════════════════════
    // Payload parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verified_but_malformed_payload_is_parse_error() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let payload = "not valid json";
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(TEST_SECRET, timestamp, payload);
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verifier.verify_and_parse(payload.as_bytes(), &header);
        assert!(matches!(result, Err(WebhookError::Parse(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant-time comparison
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal() {
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
    }

    #[test]
    fn constant_time_compare_different() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 4]));
    }

    #[test]
    fn constant_time_compare_length_mismatch() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }
}
