//! Stripe billing adapter.

mod adapter;
mod types;

pub use adapter::StripeBillingAdapter;
