//! Membership subscription model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The membership plan sold through checkout.
pub const PLAN_FREE_DELIVERY: &str = "FREE_DELIVERY";

/// Subscription status as reported by the billing provider.
///
/// Statuses we do not recognize are preserved verbatim rather than
/// rejected, so new provider statuses never break reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
    Inactive,
    Other(String),
}

impl SubscriptionStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "past_due" => Self::PastDue,
            "canceled" => Self::Canceled,
            "inactive" => Self::Inactive,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Inactive => "inactive",
            Self::Other(s) => s,
        }
    }

    /// Only an active subscription confers membership benefits.
    pub fn is_member(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Serialize for SubscriptionStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubscriptionStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// A reconciled subscription row, keyed by the provider subscription id.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRecord {
    pub contact: String,
    pub plan: String,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
    pub status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
}

/// Membership state as exposed to API clients.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipView {
    pub is_member: bool,
    pub status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
}

impl MembershipView {
    /// The view returned when no subscription exists for a contact.
    pub fn inactive() -> Self {
        Self {
            is_member: false,
            status: SubscriptionStatus::Inactive,
            current_period_end: None,
        }
    }

    pub fn from_record(record: &SubscriptionRecord) -> Self {
        Self {
            is_member: record.status.is_member(),
            status: record.status.clone(),
            current_period_end: record.current_period_end,
        }
    }
}
