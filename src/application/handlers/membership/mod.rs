mod create_checkout;
mod get_membership;
mod handle_billing_webhook;

pub use create_checkout::{CreateCheckoutCommand, CreateCheckoutError, CreateCheckoutHandler};
pub use get_membership::GetMembershipHandler;
pub use handle_billing_webhook::{HandleBillingWebhookHandler, WebhookOutcome};
