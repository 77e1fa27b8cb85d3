//! Subscription persistence port.

use async_trait::async_trait;

use super::order_repository::StoreError;
use crate::domain::subscription::SubscriptionRecord;

/// Persists reconciled membership subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Inserts or replaces the row keyed by `stripe_subscription_id`.
    ///
    /// Redelivered events land on the same row, so reconciliation is
    /// idempotent and the latest delivery wins.
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), StoreError>;

    /// Finds the most recently created subscription for a contact and plan.
    async fn find_latest_by_contact(
        &self,
        contact: &str,
        plan: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError>;
}
