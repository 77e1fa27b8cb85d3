//! PostgreSQL adapters backed by sqlx.

mod order_repository;
mod product_catalog;
mod subscription_store;

pub use order_repository::PostgresOrderRepository;
pub use product_catalog::PostgresProductCatalog;
pub use subscription_store::PostgresSubscriptionStore;
