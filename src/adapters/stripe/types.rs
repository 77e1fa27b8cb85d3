//! Wire types for the Stripe REST API.

use serde::Deserialize;
use std::collections::HashMap;

/// Checkout session as returned by `POST /v1/checkout/sessions`.
#[derive(Debug, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Subscription as returned by `GET /v1/subscriptions/{id}`.
#[derive(Debug, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    pub customer: String,
    pub status: String,
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Stripe error response envelope.
#[derive(Debug, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorBody {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}
