//! Order persistence port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::order::{NewOrder, Order};

/// Persistence failures surfaced by repository adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

/// Persists accepted orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts a new order and returns the persisted row.
    async fn insert(&self, order: NewOrder) -> Result<Order, StoreError>;
}
