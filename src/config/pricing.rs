//! Delivery pricing configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::pricing::PricingPolicy;

/// Delivery pricing configuration.
///
/// Amounts are integer minor-currency units (cents).
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Flat delivery fee charged to non-members
    #[serde(default = "default_non_member_fee_cents")]
    pub non_member_fee_cents: i64,

    /// Minimum subtotal at which members get free delivery
    #[serde(default = "default_free_delivery_min_cents")]
    pub free_delivery_min_cents: i64,
}

impl PricingConfig {
    /// Convert into the domain pricing policy
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            non_member_fee_cents: self.non_member_fee_cents,
            free_delivery_min_cents: self.free_delivery_min_cents,
        }
    }

    /// Validate pricing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.non_member_fee_cents < 0 || self.free_delivery_min_cents < 0 {
            return Err(ValidationError::NegativePricingAmount);
        }
        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            non_member_fee_cents: default_non_member_fee_cents(),
            free_delivery_min_cents: default_free_delivery_min_cents(),
        }
    }
}

fn default_non_member_fee_cents() -> i64 {
    500
}

fn default_free_delivery_min_cents() -> i64 {
    2500
}
