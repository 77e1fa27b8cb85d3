//! HandleBillingWebhookHandler - Command handler reconciling billing events.
//!
//! Verifies the delivery signature, then projects the event onto the
//! subscriptions table. The upsert is keyed by subscription id, so
//! redelivered events are idempotent and the latest delivery wins.

use std::sync::Arc;

use crate::domain::subscription::{
    SubscriptionRecord, SubscriptionStatus, PLAN_FREE_DELIVERY,
};
use crate::domain::webhook::event::{CheckoutSessionObject, SubscriptionObject};
use crate::domain::webhook::{BillingEvent, BillingEventKind, WebhookError, WebhookVerifier};
use crate::ports::{BillingProvider, SubscriptionStore};

/// What the reconciler did with a verified event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Subscription state was written.
    Reconciled,
    /// A handled event type lacked the data needed to reconcile.
    Skipped,
    /// Event type we do not handle.
    Ignored,
}

/// Handler for billing provider webhook deliveries.
pub struct HandleBillingWebhookHandler {
    verifier: WebhookVerifier,
    billing: Arc<dyn BillingProvider>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl HandleBillingWebhookHandler {
    pub fn new(
        verifier: WebhookVerifier,
        billing: Arc<dyn BillingProvider>,
        subscriptions: Arc<dyn SubscriptionStore>,
    ) -> Self {
        Self {
            verifier,
            billing,
            subscriptions,
        }
    }

    pub async fn handle(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookOutcome, WebhookError> {
        let event = self.verifier.verify_and_parse(payload, signature_header)?;

        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "webhook verified");

        match event.kind() {
            BillingEventKind::CheckoutSessionCompleted => {
                self.reconcile_checkout_completed(&event).await
            }
            BillingEventKind::SubscriptionUpdated => {
                self.reconcile_subscription_event(&event, None).await
            }
            BillingEventKind::SubscriptionDeleted => {
                // A deleted subscription is canceled regardless of the
                // status the event object still carries.
                self.reconcile_subscription_event(&event, Some(SubscriptionStatus::Canceled))
                    .await
            }
            BillingEventKind::Other => {
                tracing::debug!(event_type = %event.event_type, "ignoring unhandled event type");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }

    /// Handles `checkout.session.completed`.
    ///
    /// The session object is a thin pointer; the subscription it created
    /// is fetched from the provider so the stored status and period end
    /// are authoritative rather than whatever the session snapshot says.
    async fn reconcile_checkout_completed(
        &self,
        event: &BillingEvent,
    ) -> Result<WebhookOutcome, WebhookError> {
        let session: CheckoutSessionObject = event.object_as()?;
        let session_id = session.id.as_deref().unwrap_or("<unknown>");

        let subscription_id = match &session.subscription {
            Some(subscription) => subscription.id().to_string(),
            None => {
                tracing::warn!(session_id, "session has no subscription, skipping");
                return Ok(WebhookOutcome::Skipped);
            }
        };
        let customer_id = match &session.customer {
            Some(customer) => customer.id().to_string(),
            None => {
                tracing::warn!(session_id, "session has no customer, skipping");
                return Ok(WebhookOutcome::Skipped);
            }
        };
        let contact = match session
            .metadata
            .get("contact")
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
        {
            Some(contact) => contact.to_string(),
            None => {
                tracing::warn!(session_id, "session has no contact, skipping");
                return Ok(WebhookOutcome::Skipped);
            }
        };

        let subscription = self
            .billing
            .get_subscription(&subscription_id)
            .await
            .map_err(|e| WebhookError::Billing(e.to_string()))?;

        // Subscription metadata wins over the session snapshot.
        let plan = subscription
            .metadata
            .get("plan")
            .or_else(|| session.metadata.get("plan"))
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map_or_else(|| PLAN_FREE_DELIVERY.to_string(), str::to_string);

        let record = SubscriptionRecord {
            contact,
            plan,
            stripe_customer_id: customer_id,
            stripe_subscription_id: subscription.id.clone(),
            status: subscription.status.clone(),
            current_period_end: subscription
                .current_period_end
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)),
        };

        self.upsert(record).await
    }

    /// Handles `customer.subscription.updated` and `.deleted`.
    ///
    /// These events carry the full subscription object, so no provider
    /// round trip is needed.
    async fn reconcile_subscription_event(
        &self,
        event: &BillingEvent,
        forced_status: Option<SubscriptionStatus>,
    ) -> Result<WebhookOutcome, WebhookError> {
        let object: SubscriptionObject = event.object_as()?;

        let subscription_id = match object
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            Some(id) => id.to_string(),
            None => {
                tracing::warn!(event_id = %event.id, "event has no subscription id, skipping");
                return Ok(WebhookOutcome::Skipped);
            }
        };
        let customer_id = match &object.customer {
            Some(customer) => customer.id().to_string(),
            None => {
                tracing::warn!(%subscription_id, "event has no customer, skipping");
                return Ok(WebhookOutcome::Skipped);
            }
        };
        let contact = match object
            .metadata
            .get("contact")
            .filter(|c| !c.trim().is_empty())
        {
            Some(contact) => contact.clone(),
            None => {
                tracing::warn!(%subscription_id, "event has no contact, skipping");
                return Ok(WebhookOutcome::Skipped);
            }
        };

        let status = match forced_status {
            Some(status) => status,
            None => match object.status.as_deref().filter(|s| !s.trim().is_empty()) {
                Some(status) => SubscriptionStatus::parse(status),
                None => {
                    tracing::warn!(%subscription_id, "event has no status, skipping");
                    return Ok(WebhookOutcome::Skipped);
                }
            },
        };
        let plan = object
            .metadata
            .get("plan")
            .cloned()
            .unwrap_or_else(|| PLAN_FREE_DELIVERY.to_string());

        let record = SubscriptionRecord {
            contact,
            plan,
            stripe_customer_id: customer_id,
            stripe_subscription_id: subscription_id,
            status,
            current_period_end: object
                .current_period_end
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)),
        };

        self.upsert(record).await
    }

    async fn upsert(&self, record: SubscriptionRecord) -> Result<WebhookOutcome, WebhookError> {
        self.subscriptions
            .upsert(&record)
            .await
            .map_err(|e| WebhookError::Storage(e.to_string()))?;

        tracing::info!(
            subscription_id = %record.stripe_subscription_id,
            status = %record.status.as_str(),
            "subscription reconciled"
        );

        Ok(WebhookOutcome::Reconciled)
    }
}
