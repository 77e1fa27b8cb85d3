//! Billing provider port.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::subscription::SubscriptionStatus;

/// Request to start a hosted subscription checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionRequest {
    /// Customer contact (email or phone) carried through as metadata.
    pub contact: String,
    /// Plan label carried through as metadata.
    pub plan: String,
    /// Provider price id to subscribe to.
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created hosted checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page the customer is redirected to.
    pub url: String,
}

/// Authoritative subscription state fetched from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingSubscription {
    pub id: String,
    pub customer_id: String,
    pub status: SubscriptionStatus,
    /// Unix timestamp of the current period end, if set.
    pub current_period_end: Option<i64>,
    pub metadata: HashMap<String, String>,
}

/// Errors from the billing provider.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Request never reached the provider or the response was unreadable.
    #[error("billing network error: {0}")]
    Network(String),

    /// The provider returned an error response.
    #[error("billing provider error: {message}")]
    Provider {
        message: String,
        details: Option<String>,
        error_type: Option<String>,
    },
}

/// Operations the storefront needs from its billing provider.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Creates a hosted subscription checkout session.
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, BillingError>;

    /// Fetches the current state of a subscription by provider id.
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<BillingSubscription, BillingError>;
}
