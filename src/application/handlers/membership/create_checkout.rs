//! CreateCheckoutHandler - Command handler for starting a membership checkout.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::subscription::PLAN_FREE_DELIVERY;
use crate::ports::{BillingError, BillingProvider, CheckoutSession, CheckoutSessionRequest};

/// Command to start a hosted subscription checkout.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub contact: Option<String>,
}

/// Errors from checkout creation.
#[derive(Debug, Error)]
pub enum CreateCheckoutError {
    #[error("Contact is required (email or phone).")]
    ContactRequired,

    #[error(transparent)]
    Billing(#[from] BillingError),
}

/// Handler creating hosted checkout sessions for the free-delivery plan.
pub struct CreateCheckoutHandler {
    billing: Arc<dyn BillingProvider>,
    price_id: String,
    success_url: String,
    cancel_url: String,
}

impl CreateCheckoutHandler {
    pub fn new(
        billing: Arc<dyn BillingProvider>,
        price_id: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            billing,
            price_id: price_id.into(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutCommand,
    ) -> Result<CheckoutSession, CreateCheckoutError> {
        let contact = cmd
            .contact
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(CreateCheckoutError::ContactRequired)?;

        let session = self
            .billing
            .create_checkout_session(CheckoutSessionRequest {
                contact: contact.to_string(),
                plan: PLAN_FREE_DELIVERY.to_string(),
                price_id: self.price_id.clone(),
                success_url: self.success_url.clone(),
                cancel_url: self.cancel_url.clone(),
            })
            .await?;

        tracing::info!(session_id = %session.id, "checkout session created");

        Ok(session)
    }
}
