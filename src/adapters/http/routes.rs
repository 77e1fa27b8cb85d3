//! Route table for the storefront API.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, AppState};

/// Storefront routes mounted under /api.
fn api_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/orders", post(handlers::create_order))
        .route("/checkout", post(handlers::create_checkout))
        .route("/membership", get(handlers::get_membership))
}

/// Webhook routes mounted under /api/webhooks.
fn webhook_router() -> Router<AppState> {
    Router::new().route("/stripe", post(handlers::stripe_webhook))
}

/// The complete application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .nest("/api/webhooks", webhook_router())
        .with_state(state)
}
