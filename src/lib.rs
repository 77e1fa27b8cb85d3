//! Doorstep Market - Storefront backend for in-building grocery delivery.
//!
//! Exposes a small JSON API for browsing products, placing delivery orders,
//! and maintaining a paid free-delivery membership billed through Stripe.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
