//! Sprtshop Core - Shared domain library.
//!
//! This crate provides the domain types and pure logic used across all
//! yourdailysprtshop components:
//! - `storefront` - Customer-facing site and role-gated admin console
//! - `integration-tests` - Cross-crate behavior tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. All persistent state lives in the remote backend; the
//! types here are its wire entities plus the money and pricing logic the
//! frontend computes locally.
//!
//! # Modules
//!
//! - [`types`] - Money, entity IDs, categories, catalog/cart/order entities
//! - [`pricing`] - Priced-item resolution and cart total computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use types::*;
