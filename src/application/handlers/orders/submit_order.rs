//! SubmitOrderHandler - Command handler for accepting storefront orders.
//!
//! Validates the payload, prices the order server-side, and persists it.
//! Client-sent totals are never trusted: the subtotal is recomputed from
//! the line items, and when the order carries a contact the delivery fee
//! is re-derived from the contact's membership state.

use std::sync::Arc;

use crate::domain::order::{self, NewOrder, Order, OrderError, OrderItem};
use crate::domain::pricing::{CartLine, PricingPolicy, Quote};
use crate::domain::subscription::PLAN_FREE_DELIVERY;
use crate::ports::{OrderRepository, SubscriptionStore};

/// Command to submit a new order.
#[derive(Debug, Clone)]
pub struct SubmitOrderCommand {
    pub unit: String,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    /// Contact used for the membership lookup. Falls back to the phone
    /// number when absent.
    pub contact: Option<String>,
    /// Fee the client displayed at checkout; used only as a fallback when
    /// no contact is available to derive membership from.
    pub quoted_delivery_fee_cents: Option<i64>,
}

/// Handler for order intake.
pub struct SubmitOrderHandler {
    orders: Arc<dyn OrderRepository>,
    subscriptions: Arc<dyn SubscriptionStore>,
    policy: PricingPolicy,
}

impl SubmitOrderHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        subscriptions: Arc<dyn SubscriptionStore>,
        policy: PricingPolicy,
    ) -> Self {
        Self {
            orders,
            subscriptions,
            policy,
        }
    }

    pub async fn handle(&self, cmd: SubmitOrderCommand) -> Result<Order, OrderError> {
        // 1. Validate before touching any port
        let unit = cmd.unit.trim();
        if unit.is_empty() {
            return Err(OrderError::UnitRequired);
        }
        order::validate_items(&cmd.items)?;

        // 2. Price server-side
        let lines: Vec<CartLine> = cmd
            .items
            .iter()
            .map(|item| CartLine {
                price_cents: item.price_cents,
                qty: item.qty,
            })
            .collect();

        let customer_name = non_blank(cmd.customer_name);
        let phone = non_blank(cmd.phone);
        let contact = non_blank(cmd.contact).or_else(|| phone.clone());

        let quote = match &contact {
            Some(contact) => {
                let is_member = self
                    .subscriptions
                    .find_latest_by_contact(contact, PLAN_FREE_DELIVERY)
                    .await
                    .map_err(|e| OrderError::Storage(e.to_string()))?
                    .map(|record| record.status.is_member())
                    .unwrap_or(false);
                self.policy
                    .quote(&lines, is_member)
                    .ok_or(OrderError::InvalidItem)?
            }
            // No contact to derive membership from; accept the quoted fee
            // but never a negative one.
            None => {
                let subtotal_cents =
                    PricingPolicy::subtotal(&lines).ok_or(OrderError::InvalidItem)?;
                let delivery_fee_cents = cmd.quoted_delivery_fee_cents.unwrap_or(0).max(0);
                Quote {
                    subtotal_cents,
                    delivery_fee_cents,
                    total_cents: subtotal_cents
                        .checked_add(delivery_fee_cents)
                        .ok_or(OrderError::InvalidItem)?,
                }
            }
        };

        // 3. Persist
        let new_order = NewOrder {
            unit: unit.to_string(),
            customer_name,
            phone,
            notes: non_blank(cmd.notes),
            items: cmd.items,
            subtotal_cents: quote.subtotal_cents,
            delivery_fee_cents: quote.delivery_fee_cents,
            total_cents: quote.total_cents,
        };

        let order = self
            .orders
            .insert(new_order)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?;

        tracing::info!(
            order_id = %order.id,
            unit = %order.unit,
            total_cents = order.total_cents,
            "order accepted"
        );

        Ok(order)
    }
}

/// Trims a free-text field, storing NULL rather than an empty string.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
