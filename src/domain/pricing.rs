//! Order pricing rules.
//!
//! All amounts are integer cents. Totals are derived server-side from
//! the line items; client-sent totals are never trusted.

use serde::{Deserialize, Serialize};

/// Delivery fee policy applied when quoting an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Flat delivery fee for non-members.
    pub non_member_fee_cents: i64,
    /// Subtotal threshold above which members get free delivery.
    pub free_delivery_min_cents: i64,
}

/// A single priced line in a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub price_cents: i64,
    pub qty: i64,
}

/// A fully priced order quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
}

impl PricingPolicy {
    /// Computes the subtotal for a set of cart lines.
    ///
    /// Returns `None` when the sum overflows `i64`. Line quantities and
    /// prices come straight from the request, so the arithmetic must not
    /// be allowed to wrap into a negative total.
    pub fn subtotal(lines: &[CartLine]) -> Option<i64> {
        lines.iter().try_fold(0i64, |acc, line| {
            line.price_cents
                .checked_mul(line.qty)
                .and_then(|line_total| acc.checked_add(line_total))
        })
    }

    /// Computes the delivery fee for a given subtotal and membership state.
    ///
    /// Members pay nothing once the subtotal clears the free-delivery
    /// threshold; everyone else pays the flat non-member fee. An empty
    /// cart (zero subtotal) is never charged a fee.
    pub fn delivery_fee(&self, subtotal_cents: i64, is_member: bool) -> i64 {
        if subtotal_cents <= 0 {
            return 0;
        }
        if is_member && subtotal_cents >= self.free_delivery_min_cents {
            return 0;
        }
        self.non_member_fee_cents
    }

    /// Produces a complete quote for the given cart lines, or `None` when
    /// the amounts overflow.
    pub fn quote(&self, lines: &[CartLine], is_member: bool) -> Option<Quote> {
        let subtotal_cents = Self::subtotal(lines)?;
        let delivery_fee_cents = self.delivery_fee(subtotal_cents, is_member);
        Some(Quote {
            subtotal_cents,
            delivery_fee_cents,
            total_cents: subtotal_cents.checked_add(delivery_fee_cents)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PricingPolicy {
        PricingPolicy {
            non_member_fee_cents: 500,
            free_delivery_min_cents: 2500,
        }
    }

    #[test]
    fn subtotal_sums_price_times_qty() {
        let lines = [
            CartLine {
                price_cents: 350,
                qty: 2,
            },
            CartLine {
                price_cents: 1200,
                qty: 1,
            },
        ];
        assert_eq!(PricingPolicy::subtotal(&lines), Some(1900));
    }

    #[test]
    fn subtotal_overflow_is_detected() {
        let lines = [CartLine {
            price_cents: i64::MAX,
            qty: 2,
        }];
        assert_eq!(PricingPolicy::subtotal(&lines), None);

        let lines = [
            CartLine {
                price_cents: i64::MAX,
                qty: 1,
            },
            CartLine {
                price_cents: 1,
                qty: 1,
            },
        ];
        assert_eq!(PricingPolicy::subtotal(&lines), None);
    }

    #[test]
    fn empty_cart_has_no_fee() {
        assert_eq!(policy().delivery_fee(0, false), 0);
        assert_eq!(policy().delivery_fee(0, true), 0);
    }

    #[test]
    fn non_member_pays_flat_fee() {
        assert_eq!(policy().delivery_fee(5000, false), 500);
    }

    #[test]
    fn member_below_threshold_still_pays() {
        assert_eq!(policy().delivery_fee(2000, true), 500);
    }

    #[test]
    fn member_at_threshold_rides_free() {
        assert_eq!(policy().delivery_fee(2500, true), 0);
        assert_eq!(policy().delivery_fee(9900, true), 0);
    }

    #[test]
    fn quote_combines_subtotal_and_fee() {
        let lines = [CartLine {
            price_cents: 1000,
            qty: 3,
        }];
        let quote = policy().quote(&lines, true).unwrap();
        assert_eq!(quote.subtotal_cents, 3000);
        assert_eq!(quote.delivery_fee_cents, 0);
        assert_eq!(quote.total_cents, 3000);

        let quote = policy().quote(&lines, false).unwrap();
        assert_eq!(quote.delivery_fee_cents, 500);
        assert_eq!(quote.total_cents, 3500);
    }

    #[test]
    fn quote_refuses_overflowing_cart() {
        let lines = [CartLine {
            price_cents: i64::MAX / 2,
            qty: 3,
        }];
        assert_eq!(policy().quote(&lines, false), None);

        // Fee addition can overflow even when the subtotal fits.
        let lines = [CartLine {
            price_cents: i64::MAX,
            qty: 1,
        }];
        assert_eq!(policy().quote(&lines, false), None);
    }
}
