//! Webhook processing errors.

use thiserror::Error;

/// Errors that can occur while verifying or processing a billing webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature did not match the payload.
    #[error("webhook signature verification failed")]
    InvalidSignature,

    /// Event timestamp is older than the replay window.
    #[error("webhook timestamp is too old")]
    StaleTimestamp,

    /// Event timestamp is too far in the future.
    #[error("webhook timestamp is in the future")]
    FutureTimestamp,

    /// Signature header or payload could not be parsed.
    #[error("webhook parse error: {0}")]
    Parse(String),

    /// Persisting the reconciled subscription failed.
    #[error("subscription store error: {0}")]
    Storage(String),

    /// Fetching authoritative state from the billing provider failed.
    #[error("billing provider error: {0}")]
    Billing(String),
}

impl WebhookError {
    /// HTTP status the API returns for this error.
    ///
    /// Verification failures are the sender's fault and get 400 so the
    /// provider does not retry forged or stale deliveries. Downstream
    /// failures get 500 so the provider retries.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidSignature
            | Self::StaleTimestamp
            | Self::FutureTimestamp
            | Self::Parse(_) => 400,
            Self::Storage(_) | Self::Billing(_) => 500,
        }
    }

    /// Whether the provider should redeliver the event.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Billing(_))
    }
}
