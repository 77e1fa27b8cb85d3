//! Domain layer: core storefront types and rules.
//!
//! This layer has no knowledge of HTTP, Postgres, or Stripe transport
//! details. Everything here is plain data and pure logic.

pub mod order;
pub mod pricing;
pub mod product;
pub mod subscription;
pub mod webhook;
