//! FreshBasket Core - Shared types library.
//!
//! This crate provides common types used across all FreshBasket components:
//! - `server` - REST backend serving the catalog, carts, and orders
//! - `integration-tests` - End-to-end tests against the in-memory store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
