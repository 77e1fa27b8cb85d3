//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use doorstep_market::adapters::http::{app_router, AppState};
use doorstep_market::config::BillingConfig;
use doorstep_market::domain::order::{NewOrder, Order, OrderStatus};
use doorstep_market::domain::pricing::PricingPolicy;
use doorstep_market::domain::product::Product;
use doorstep_market::domain::subscription::{SubscriptionRecord, SubscriptionStatus};
use doorstep_market::ports::{
    BillingError, BillingProvider, BillingSubscription, CheckoutSession, CheckoutSessionRequest,
    OrderRepository, ProductCatalog, StoreError, SubscriptionStore,
};

pub const TEST_WEBHOOK_SECRET: &str = "whsec_integration_tests";

/// In-memory order repository capturing inserts.
#[derive(Default)]
pub struct InMemoryOrders {
    pub inserted: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn insert(&self, order: NewOrder) -> Result<Order, StoreError> {
        let order = Order {
            id: Uuid::new_v4(),
            unit: order.unit,
            customer_name: order.customer_name,
            phone: order.phone,
            notes: order.notes,
            items: order.items,
            subtotal_cents: order.subtotal_cents,
            delivery_fee_cents: order.delivery_fee_cents,
            total_cents: order.total_cents,
            status: OrderStatus::New,
            created_at: Utc::now(),
        };
        self.inserted.lock().unwrap().push(order.clone());
        Ok(order)
    }
}

/// In-memory subscription store keyed by subscription id, mirroring the
/// database upsert semantics.
#[derive(Default)]
pub struct InMemorySubscriptions {
    pub rows: Mutex<HashMap<String, SubscriptionRecord>>,
}

impl InMemorySubscriptions {
    pub fn with_record(record: SubscriptionRecord) -> Self {
        let store = Self::default();
        store
            .rows
            .lock()
            .unwrap()
            .insert(record.stripe_subscription_id.clone(), record);
        store
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, subscription_id: &str) -> Option<SubscriptionRecord> {
        self.rows.lock().unwrap().get(subscription_id).cloned()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptions {
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), StoreError> {
        self.rows
            .lock()
            .unwrap()
            .insert(record.stripe_subscription_id.clone(), record.clone());
        Ok(())
    }

    async fn find_latest_by_contact(
        &self,
        contact: &str,
        plan: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|record| record.contact == contact && record.plan == plan)
            .cloned())
    }
}

/// Catalog returning a fixed product list.
pub struct FixedCatalog {
    pub products: Vec<Product>,
}

impl Default for FixedCatalog {
    fn default() -> Self {
        Self {
            products: vec![
                Product {
                    id: Uuid::new_v4(),
                    name: "Whole Milk".to_string(),
                    category: "dairy".to_string(),
                    price_cents: 450,
                    image_url: None,
                    sort_order: 1,
                },
                Product {
                    id: Uuid::new_v4(),
                    name: "Sourdough Loaf".to_string(),
                    category: "bakery".to_string(),
                    price_cents: 650,
                    image_url: Some("https://cdn.example.com/sourdough.jpg".to_string()),
                    sort_order: 2,
                },
            ],
        }
    }
}

#[async_trait]
impl ProductCatalog for FixedCatalog {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.clone())
    }
}

/// Scriptable billing provider.
pub struct MockBilling {
    pub session_url: Option<String>,
    pub subscription: Option<BillingSubscription>,
}

impl Default for MockBilling {
    fn default() -> Self {
        Self {
            session_url: Some("https://checkout.stripe.com/c/pay/cs_test_1".to_string()),
            subscription: None,
        }
    }
}

#[async_trait]
impl BillingProvider for MockBilling {
    async fn create_checkout_session(
        &self,
        _request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, BillingError> {
        match &self.session_url {
            Some(url) => Ok(CheckoutSession {
                id: "cs_test_1".to_string(),
                url: url.clone(),
            }),
            None => Err(BillingError::Provider {
                message: "No such price: 'price_missing'".to_string(),
                details: None,
                error_type: Some("invalid_request_error".to_string()),
            }),
        }
    }

    async fn get_subscription(
        &self,
        _subscription_id: &str,
    ) -> Result<BillingSubscription, BillingError> {
        self.subscription
            .clone()
            .ok_or_else(|| BillingError::Network("subscription fetch failed".to_string()))
    }
}

pub fn active_subscription(contact: &str) -> BillingSubscription {
    BillingSubscription {
        id: "sub_1".to_string(),
        customer_id: "cus_1".to_string(),
        status: SubscriptionStatus::Active,
        current_period_end: Some(1767225600),
        metadata: HashMap::from([("contact".to_string(), contact.to_string())]),
    }
}

pub fn active_record(contact: &str) -> SubscriptionRecord {
    SubscriptionRecord {
        contact: contact.to_string(),
        plan: "FREE_DELIVERY".to_string(),
        stripe_customer_id: "cus_1".to_string(),
        stripe_subscription_id: "sub_1".to_string(),
        status: SubscriptionStatus::Active,
        current_period_end: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub orders: Arc<InMemoryOrders>,
    pub subscriptions: Arc<InMemorySubscriptions>,
}

pub fn test_app(billing: MockBilling, subscriptions: InMemorySubscriptions) -> TestApp {
    let orders = Arc::new(InMemoryOrders::default());
    let subscriptions = Arc::new(subscriptions);

    let state = AppState {
        orders: orders.clone(),
        subscriptions: subscriptions.clone(),
        catalog: Arc::new(FixedCatalog::default()),
        billing: Arc::new(billing),
        billing_config: BillingConfig {
            stripe_secret_key: "sk_test_integration".to_string(),
            stripe_webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
            stripe_price_free_delivery: "price_free_delivery".to_string(),
            base_url: "http://localhost:3000".to_string(),
        },
        pricing: PricingPolicy {
            non_member_fee_cents: 500,
            free_delivery_min_cents: 2500,
        },
    };

    TestApp {
        router: app_router(state),
        orders,
        subscriptions,
    }
}
