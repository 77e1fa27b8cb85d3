//! Stripe implementation of the `BillingProvider` port.
//!
//! Talks to the Stripe REST API over form-encoded requests with basic
//! auth. The secret key is held in `secrecy::SecretString` so it never
//! shows up in debug output.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::subscription::SubscriptionStatus;
use crate::ports::{
    BillingError, BillingProvider, BillingSubscription, CheckoutSession, CheckoutSessionRequest,
};

use super::types::{StripeCheckoutSession, StripeErrorEnvelope, StripeSubscription};

const API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe billing adapter.
pub struct StripeBillingAdapter {
    api_key: SecretString,
    http_client: reqwest::Client,
}

impl StripeBillingAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            http_client: reqwest::Client::new(),
        }
    }

    /// Turns a non-2xx Stripe response into a `BillingError::Provider`.
    async fn provider_error(response: reqwest::Response) -> BillingError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<StripeErrorEnvelope>(&body) {
            Ok(envelope) => BillingError::Provider {
                message: envelope
                    .error
                    .message
                    .unwrap_or_else(|| format!("Stripe returned {}", status)),
                details: Some(body),
                error_type: envelope.error.error_type,
            },
            Err(_) => BillingError::Provider {
                message: format!("Stripe returned {}", status),
                details: Some(body),
                error_type: None,
            },
        }
    }
}

#[async_trait]
impl BillingProvider for StripeBillingAdapter {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, BillingError> {
        let url = format!("{}/v1/checkout/sessions", API_BASE_URL);

        let params = [
            ("mode", "subscription".to_string()),
            ("line_items[0][price]", request.price_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("customer_creation", "always".to_string()),
            ("allow_promotion_codes", "true".to_string()),
            // Metadata goes on the session and, via subscription_data, on
            // the subscription it creates, so later subscription events
            // still carry the contact.
            ("metadata[contact]", request.contact.clone()),
            ("metadata[plan]", request.plan.clone()),
            ("subscription_data[metadata][contact]", request.contact.clone()),
            ("subscription_data[metadata][plan]", request.plan.clone()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error = Self::provider_error(response).await;
            tracing::error!(error = %error, "Stripe create_checkout_session failed");
            return Err(error);
        }

        let session: StripeCheckoutSession = response
            .json()
            .await
            .map_err(|e| BillingError::Network(format!("invalid Stripe response: {}", e)))?;

        let checkout_url = session.url.ok_or_else(|| BillingError::Provider {
            message: "checkout session has no URL".to_string(),
            details: None,
            error_type: None,
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url: checkout_url,
        })
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<BillingSubscription, BillingError> {
        let url = format!("{}/v1/subscriptions/{}", API_BASE_URL, subscription_id);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error = Self::provider_error(response).await;
            tracing::error!(subscription_id, error = %error, "Stripe get_subscription failed");
            return Err(error);
        }

        let subscription: StripeSubscription = response
            .json()
            .await
            .map_err(|e| BillingError::Network(format!("invalid Stripe response: {}", e)))?;

        Ok(BillingSubscription {
            id: subscription.id,
            customer_id: subscription.customer,
            status: SubscriptionStatus::parse(&subscription.status),
            current_period_end: subscription.current_period_end,
            metadata: subscription.metadata,
        })
    }
}
