//! PostgreSQL subscription store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::subscription::{SubscriptionRecord, SubscriptionStatus};
use crate::ports::{StoreError, SubscriptionStore};

pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row for the subscriptions table.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    contact: String,
    plan: String,
    stripe_customer_id: String,
    stripe_subscription_id: String,
    status: String,
    current_period_end: Option<DateTime<Utc>>,
}

impl From<SubscriptionRow> for SubscriptionRecord {
    fn from(row: SubscriptionRow) -> Self {
        SubscriptionRecord {
            contact: row.contact,
            plan: row.plan,
            stripe_customer_id: row.stripe_customer_id,
            stripe_subscription_id: row.stripe_subscription_id,
            status: SubscriptionStatus::parse(&row.status),
            current_period_end: row.current_period_end,
        }
    }
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), StoreError> {
        // Full-row replace keyed by subscription id: redelivered and
        // out-of-order events resolve to whichever arrived last.
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                contact, plan, stripe_customer_id, stripe_subscription_id,
                status, current_period_end
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (stripe_subscription_id) DO UPDATE SET
                contact = EXCLUDED.contact,
                plan = EXCLUDED.plan,
                stripe_customer_id = EXCLUDED.stripe_customer_id,
                status = EXCLUDED.status,
                current_period_end = EXCLUDED.current_period_end,
                updated_at = now()
            "#,
        )
        .bind(&record.contact)
        .bind(&record.plan)
        .bind(&record.stripe_customer_id)
        .bind(&record.stripe_subscription_id)
        .bind(record.status.as_str())
        .bind(record.current_period_end)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_latest_by_contact(
        &self,
        contact: &str,
        plan: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT contact, plan, stripe_customer_id, stripe_subscription_id,
                   status, current_period_end
            FROM subscriptions
            WHERE contact = $1 AND plan = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(contact)
        .bind(plan)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(SubscriptionRecord::from))
    }
}
