//! Billing configuration (Stripe)

use serde::Deserialize;

use super::error::ValidationError;

/// Billing configuration for the Stripe integration.
///
/// A missing secret key or price id is a fatal misconfiguration: it is caught
/// at startup by [`BillingConfig::validate`] rather than surfaced per request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingConfig {
    /// Stripe secret API key (sk_test_... or sk_live_...)
    pub stripe_secret_key: String,

    /// Stripe webhook signing secret (whsec_...)
    pub stripe_webhook_secret: String,

    /// Stripe price ID for the free-delivery membership plan
    pub stripe_price_free_delivery: String,

    /// Public base URL used to build checkout redirect targets
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl BillingConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key.starts_with("sk_test_")
    }

    /// URL the customer lands on after a successful checkout
    pub fn success_url(&self) -> String {
        format!("{}/subscribe?success=1", self.base_url.trim_end_matches('/'))
    }

    /// URL the customer lands on after abandoning checkout
    pub fn cancel_url(&self) -> String {
        format!("{}/subscribe?canceled=1", self.base_url.trim_end_matches('/'))
    }

    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if self.stripe_price_free_delivery.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_PRICE_FREE_DELIVERY"));
        }

        // Verify key prefixes for safety
        if !self.stripe_secret_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
