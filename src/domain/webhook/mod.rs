//! Billing webhook domain: event shapes, signature verification, errors.

pub mod errors;
pub mod event;
pub mod verifier;

pub use errors::WebhookError;
pub use event::{BillingEvent, BillingEventKind};
pub use verifier::WebhookVerifier;
