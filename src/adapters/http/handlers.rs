//! Axum request handlers and shared application state.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::catalog::ListProductsHandler;
use crate::application::handlers::membership::{
    CreateCheckoutCommand, CreateCheckoutError, CreateCheckoutHandler, GetMembershipHandler,
    HandleBillingWebhookHandler,
};
use crate::application::handlers::orders::{SubmitOrderCommand, SubmitOrderHandler};
use crate::config::BillingConfig;
use crate::domain::order::{OrderError, OrderItem};
use crate::domain::pricing::PricingPolicy;
use crate::domain::webhook::{WebhookError, WebhookVerifier};
use crate::ports::{
    BillingError, BillingProvider, OrderRepository, ProductCatalog, StoreError, SubscriptionStore,
};

use super::dto::{
    CheckoutRequest, CheckoutResponse, CreateOrderRequest, ErrorResponse, MembershipQuery,
    MembershipResponse, OrderResponse, ProductsResponse, WebhookAck,
};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub billing: Arc<dyn BillingProvider>,
    pub billing_config: BillingConfig,
    pub pricing: PricingPolicy,
}

impl AppState {
    fn list_products_handler(&self) -> ListProductsHandler {
        ListProductsHandler::new(self.catalog.clone())
    }

    fn submit_order_handler(&self) -> SubmitOrderHandler {
        SubmitOrderHandler::new(self.orders.clone(), self.subscriptions.clone(), self.pricing)
    }

    fn create_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            self.billing.clone(),
            self.billing_config.stripe_price_free_delivery.clone(),
            self.billing_config.success_url(),
            self.billing_config.cancel_url(),
        )
    }

    fn get_membership_handler(&self) -> GetMembershipHandler {
        GetMembershipHandler::new(self.subscriptions.clone())
    }

    fn webhook_handler(&self) -> HandleBillingWebhookHandler {
        HandleBillingWebhookHandler::new(
            WebhookVerifier::new(self.billing_config.stripe_webhook_secret.clone()),
            self.billing.clone(),
            self.subscriptions.clone(),
        )
    }
}

// ══════════════════════════════════════════════════════════════
// Error mapping
// ══════════════════════════════════════════════════════════════

/// Error type bridging handler failures onto HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Order(OrderError),
    Checkout(CreateCheckoutError),
    Webhook(WebhookError),
    MissingSignature,
    Store(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Order(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(err.to_string()))
            }
            ApiError::Order(err) => {
                tracing::error!(error = %err, "order persistence failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(err.to_string()),
                )
            }
            ApiError::Checkout(CreateCheckoutError::ContactRequired) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(CreateCheckoutError::ContactRequired.to_string()),
            ),
            ApiError::Checkout(CreateCheckoutError::Billing(err)) => {
                tracing::error!(error = %err, "checkout session creation failed");
                let body = match err {
                    BillingError::Provider {
                        message,
                        details,
                        error_type,
                    } => ErrorResponse {
                        error: message,
                        details,
                        error_type,
                    },
                    BillingError::Network(message) => ErrorResponse {
                        error: "Failed to reach billing provider".to_string(),
                        details: Some(message),
                        error_type: None,
                    },
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            ApiError::MissingSignature => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Missing Stripe-Signature header"),
            ),
            ApiError::Webhook(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let body = if err.is_retryable() {
                    tracing::error!(error = %err, "webhook handler failed");
                    ErrorResponse {
                        error: "Webhook handler failed".to_string(),
                        details: Some(err.to_string()),
                        error_type: None,
                    }
                } else {
                    tracing::warn!(error = %err, "webhook delivery rejected");
                    ErrorResponse::new(err.to_string())
                };
                (status, body)
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(err.to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

// ══════════════════════════════════════════════════════════════
// Handlers
// ══════════════════════════════════════════════════════════════

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .list_products_handler()
        .handle()
        .await
        .map_err(ApiError::Store)?;

    Ok(Json(ProductsResponse { products }))
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .submit_order_handler()
        .handle(SubmitOrderCommand {
            unit: request.unit,
            customer_name: request.customer_name,
            phone: request.phone,
            notes: request.notes,
            items: request.items.into_iter().map(OrderItem::from).collect(),
            contact: request.contact,
            quoted_delivery_fee_cents: request.delivery_fee_cents,
        })
        .await
        .map_err(ApiError::Order)?;

    Ok((StatusCode::CREATED, Json(OrderResponse { order })))
}

/// POST /api/checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .create_checkout_handler()
        .handle(CreateCheckoutCommand {
            contact: request.contact,
        })
        .await
        .map_err(ApiError::Checkout)?;

    Ok(Json(CheckoutResponse { url: session.url }))
}

/// GET /api/membership?contact=...
pub async fn get_membership(
    State(state): State<AppState>,
    Query(query): Query<MembershipQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .get_membership_handler()
        .handle(query.contact.as_deref())
        .await
        .map_err(ApiError::Store)?;

    Ok(Json(MembershipResponse::from(view)))
}

/// POST /api/webhooks/stripe
///
/// Takes the raw body so the signature is computed over exactly the
/// bytes Stripe signed.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::MissingSignature)?;

    state
        .webhook_handler()
        .handle(&body, signature)
        .await
        .map_err(ApiError::Webhook)?;

    Ok(Json(WebhookAck { received: true }))
}
