//! Catalog product model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// Unit price in cents.
    pub price_cents: i64,
    pub image_url: Option<String>,
    /// Display ordering; lower sorts first.
    pub sort_order: i32,
}
