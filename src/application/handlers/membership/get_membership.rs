//! GetMembershipHandler - Query handler for membership state.

use std::sync::Arc;

use crate::domain::subscription::{MembershipView, PLAN_FREE_DELIVERY};
use crate::ports::{StoreError, SubscriptionStore};

/// Handler resolving the membership state for a contact.
///
/// A blank contact is not an error: it resolves to the inactive view
/// without touching the store, so anonymous storefront sessions get a
/// cheap, consistent answer.
pub struct GetMembershipHandler {
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl GetMembershipHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionStore>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(&self, contact: Option<&str>) -> Result<MembershipView, StoreError> {
        let contact = match contact.map(str::trim).filter(|c| !c.is_empty()) {
            Some(contact) => contact,
            None => return Ok(MembershipView::inactive()),
        };

        let record = self
            .subscriptions
            .find_latest_by_contact(contact, PLAN_FREE_DELIVERY)
            .await?;

        Ok(record
            .as_ref()
            .map(MembershipView::from_record)
            .unwrap_or_else(MembershipView::inactive))
    }
}
