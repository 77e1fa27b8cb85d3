//! Ports: trait seams between the application core and its adapters.

pub mod billing_provider;
pub mod order_repository;
pub mod product_catalog;
pub mod subscription_store;

pub use billing_provider::{
    BillingError, BillingProvider, BillingSubscription, CheckoutSession, CheckoutSessionRequest,
};
pub use order_repository::{OrderRepository, StoreError};
pub use product_catalog::ProductCatalog;
pub use subscription_store::SubscriptionStore;
