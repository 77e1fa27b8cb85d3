//! PostgreSQL order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::order::{NewOrder, Order, OrderItem, OrderStatus};
use crate::ports::{OrderRepository, StoreError};

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row for the orders table.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    unit: String,
    customer_name: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
    /// Line item snapshot stored as JSONB.
    items: serde_json::Value,
    subtotal_cents: i64,
    delivery_fee_cents: i64,
    total_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Database(format!("unknown order status: {}", row.status)))?;
        let items: Vec<OrderItem> = serde_json::from_value(row.items)
            .map_err(|e| StoreError::Database(format!("invalid items snapshot: {}", e)))?;

        Ok(Order {
            id: row.id,
            unit: row.unit,
            customer_name: row.customer_name,
            phone: row.phone,
            notes: row.notes,
            items,
            subtotal_cents: row.subtotal_cents,
            delivery_fee_cents: row.delivery_fee_cents,
            total_cents: row.total_cents,
            status,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order, StoreError> {
        let items = serde_json::to_value(&order.items)
            .map_err(|e| StoreError::Database(format!("items serialization failed: {}", e)))?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (
                id, unit, customer_name, phone, notes, items,
                subtotal_cents, delivery_fee_cents, total_cents, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, unit, customer_name, phone, notes, items,
                      subtotal_cents, delivery_fee_cents, total_cents,
                      status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&order.unit)
        .bind(&order.customer_name)
        .bind(&order.phone)
        .bind(&order.notes)
        .bind(items)
        .bind(order.subtotal_cents)
        .bind(order.delivery_fee_cents)
        .bind(order.total_cents)
        .bind(OrderStatus::New.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.try_into()
    }
}
