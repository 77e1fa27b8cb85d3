//! Order model and intake validation.
//!
//! An order stores a denormalized snapshot of the purchased items so
//! that later catalog edits never change what a past order says it
//! contained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Confirmed,
    OutForDelivery,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Confirmed => "CONFIRMED",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Canceled => "CANCELED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(Self::New),
            "CONFIRMED" => Some(Self::Confirmed),
            "OUT_FOR_DELIVERY" => Some(Self::OutForDelivery),
            "DELIVERED" => Some(Self::Delivered),
            "CANCELED" => Some(Self::Canceled),
            _ => None,
        }
    }
}

/// A purchased line item, snapshotted at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub qty: i64,
    /// Unit price in cents at the time of purchase.
    pub price_cents: i64,
}

/// A validated order ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub unit: String,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub unit: String,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Errors raised while accepting an order.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    #[error("Unit is required.")]
    UnitRequired,

    #[error("Items are required.")]
    ItemsRequired,

    #[error("Invalid item payload.")]
    InvalidItem,

    #[error("{0}")]
    Storage(String),
}

impl OrderError {
    /// Whether this error is the caller's fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Validates raw line items from a client payload.
///
/// Checked in submission order: every item must carry a product id and
/// name, a positive quantity, and a non-negative unit price.
pub fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::ItemsRequired);
    }
    for item in items {
        if item.product_id.trim().is_empty() || item.name.trim().is_empty() {
            return Err(OrderError::InvalidItem);
        }
        if item.qty <= 0 {
            return Err(OrderError::InvalidItem);
        }
        if item.price_cents < 0 {
            return Err(OrderError::InvalidItem);
        }
    }
    Ok(())
}
