//! ListProductsHandler - Query handler for the storefront catalog.

use std::sync::Arc;

use crate::domain::product::Product;
use crate::ports::{ProductCatalog, StoreError};

/// Handler returning the full catalog in display order.
pub struct ListProductsHandler {
    catalog: Arc<dyn ProductCatalog>,
}

impl ListProductsHandler {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self) -> Result<Vec<Product>, StoreError> {
        self.catalog.list().await
    }
}
