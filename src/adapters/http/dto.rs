//! Wire DTOs for the storefront API.
//!
//! Request types are deliberately lenient: missing fields deserialize to
//! defaults so malformed payloads reach the domain validation, which
//! produces the contract's error messages instead of a serde error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::order::{Order, OrderItem};
use crate::domain::product::Product;
use crate::domain::subscription::MembershipView;

// ══════════════════════════════════════════════════════════════
// Requests
// ══════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub delivery_fee_cents: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderItemPayload {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub qty: i64,
    #[serde(default)]
    pub price_cents: i64,
}

impl From<OrderItemPayload> for OrderItem {
    fn from(payload: OrderItemPayload) -> Self {
        OrderItem {
            product_id: payload.product_id,
            name: payload.name,
            qty: payload.qty,
            price_cents: payload.price_cents,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MembershipQuery {
    #[serde(default)]
    pub contact: Option<String>,
}

// ══════════════════════════════════════════════════════════════
// Responses
// ══════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    #[serde(rename = "isMember")]
    pub is_member: bool,
    pub status: String,
    pub current_period_end: Option<DateTime<Utc>>,
}

impl From<MembershipView> for MembershipResponse {
    fn from(view: MembershipView) -> Self {
        MembershipResponse {
            is_member: view.is_member,
            status: view.status.as_str().to_string(),
            current_period_end: view.current_period_end,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            error_type: None,
        }
    }
}
