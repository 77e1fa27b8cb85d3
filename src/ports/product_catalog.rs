//! Product catalog port.

use async_trait::async_trait;

use super::order_repository::StoreError;
use crate::domain::product::Product;

/// Read access to the sellable catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Lists all products in display order.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;
}
