//! Billing webhook event shapes.
//!
//! Only the fields reconciliation needs are captured; everything else
//! in the provider's event schema is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::errors::WebhookError;

/// A billing provider webhook event.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingEvent {
    /// Event id (evt_xxx).
    pub id: String,

    /// Event type string, e.g. "checkout.session.completed".
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp the event was created.
    pub created: i64,

    /// Event-specific payload.
    pub data: BillingEventData,

    /// Live mode vs test mode.
    #[serde(default)]
    pub livemode: bool,
}

/// Container for the event payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingEventData {
    /// The object that triggered the event; shape depends on the event type.
    pub object: serde_json::Value,

    /// Previous values of changed attributes, for update events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl BillingEvent {
    /// Parses the event type string into a known kind.
    pub fn kind(&self) -> BillingEventKind {
        BillingEventKind::parse(&self.event_type)
    }

    /// Deserializes the payload object as the given type.
    pub fn object_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, WebhookError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| WebhookError::Parse(e.to_string()))
    }
}

/// Event types reconciliation handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingEventKind {
    CheckoutSessionCompleted,
    SubscriptionUpdated,
    SubscriptionDeleted,
    Other,
}

impl BillingEventKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            _ => Self::Other,
        }
    }
}

/// A reference that Stripe sends either as a bare id or an expanded object.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Expandable {
    Id(String),
    Object { id: String },
}

impl Expandable {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object { id } => id,
        }
    }
}

/// Payload of a `checkout.session.completed` event.
///
/// Every identifying field is optional: a malformed-but-authentic event
/// must deserialize so the reconciler can skip it instead of erroring,
/// which would make the provider redeliver forever.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutSessionObject {
    #[serde(default)]
    pub id: Option<String>,
    pub subscription: Option<Expandable>,
    pub customer: Option<Expandable>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Payload of a `customer.subscription.*` event. Same leniency as the
/// session object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionObject {
    #[serde(default)]
    pub id: Option<String>,
    pub customer: Option<Expandable>,
    #[serde(default)]
    pub status: Option<String>,
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_minimal_event() {
        let json = r#"{
            "id": "evt_123",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": { "object": {} }
        }"#;

        let event: BillingEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "evt_123");
        assert_eq!(event.kind(), BillingEventKind::CheckoutSessionCompleted);
        assert!(!event.livemode);
    }

    #[test]
    fn kind_maps_handled_types() {
        assert_eq!(
            BillingEventKind::parse("customer.subscription.updated"),
            BillingEventKind::SubscriptionUpdated
        );
        assert_eq!(
            BillingEventKind::parse("customer.subscription.deleted"),
            BillingEventKind::SubscriptionDeleted
        );
        assert_eq!(
            BillingEventKind::parse("invoice.payment_succeeded"),
            BillingEventKind::Other
        );
    }

    #[test]
    fn expandable_accepts_bare_id_and_object() {
        let bare: Expandable = serde_json::from_value(json!("sub_123")).unwrap();
        assert_eq!(bare.id(), "sub_123");

        let expanded: Expandable =
            serde_json::from_value(json!({"id": "sub_456", "status": "active"})).unwrap();
        assert_eq!(expanded.id(), "sub_456");
    }

    #[test]
    fn checkout_session_object_parses_from_event() {
        let event: BillingEvent = serde_json::from_value(json!({
            "id": "evt_cs",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "cs_test_1",
                    "subscription": "sub_1",
                    "customer": "cus_1",
                    "metadata": { "contact": "resident@example.com", "plan": "FREE_DELIVERY" }
                }
            },
            "livemode": false
        }))
        .unwrap();

        let session: CheckoutSessionObject = event.object_as().unwrap();
        assert_eq!(session.subscription.unwrap().id(), "sub_1");
        assert_eq!(session.metadata["contact"], "resident@example.com");
    }

    #[test]
    fn subscription_object_tolerates_missing_metadata() {
        let object: SubscriptionObject = serde_json::from_value(json!({
            "id": "sub_1",
            "customer": "cus_1",
            "status": "past_due",
            "current_period_end": 1735689600
        }))
        .unwrap();

        assert!(object.metadata.is_empty());
        assert_eq!(object.current_period_end, Some(1735689600));
    }

    #[test]
    fn subscription_object_tolerates_missing_id_and_status() {
        let object: SubscriptionObject =
            serde_json::from_value(json!({ "customer": "cus_1" })).unwrap();

        assert!(object.id.is_none());
        assert!(object.status.is_none());
    }

    #[test]
    fn object_as_wrong_shape_is_parse_error() {
        let event: BillingEvent = serde_json::from_value(json!({
            "id": "evt_bad",
            "type": "customer.subscription.updated",
            "created": 1704067200,
            "data": { "object": { "status": 42 } }
        }))
        .unwrap();

        let result: Result<SubscriptionObject, _> = event.object_as();
        assert!(matches!(result, Err(WebhookError::Parse(_))));
    }
}
