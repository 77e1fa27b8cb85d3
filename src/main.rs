//! doorstep-market server binary.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use doorstep_market::adapters::http::{app_router, AppState};
use doorstep_market::adapters::postgres::{
    PostgresOrderRepository, PostgresProductCatalog, PostgresSubscriptionStore,
};
use doorstep_market::adapters::stripe::StripeBillingAdapter;
use doorstep_market::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = config.billing.is_test_mode(),
        "starting doorstep-market"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let state = AppState {
        orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionStore::new(pool.clone())),
        catalog: Arc::new(PostgresProductCatalog::new(pool)),
        billing: Arc::new(StripeBillingAdapter::new(
            config.billing.stripe_secret_key.clone(),
        )),
        billing_config: config.billing.clone(),
        pricing: config.pricing.policy(),
    };

    let cors = match config.server.cors_origins_list().as_slice() {
        [] => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
        origins => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .map(|origin| origin.parse())
                .collect::<Result<_, _>>()?;
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
