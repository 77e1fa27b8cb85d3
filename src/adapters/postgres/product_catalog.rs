//! PostgreSQL product catalog.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::product::Product;
use crate::ports::{ProductCatalog, StoreError};

pub struct PostgresProductCatalog {
    pool: PgPool,
}

impl PostgresProductCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    category: String,
    price_cents: i64,
    image_url: Option<String>,
    sort_order: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            category: row.category,
            price_cents: row.price_cents,
            image_url: row.image_url,
            sort_order: row.sort_order,
        }
    }
}

#[async_trait]
impl ProductCatalog for PostgresProductCatalog {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category, price_cents, image_url, sort_order
            FROM products
            ORDER BY sort_order ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}
