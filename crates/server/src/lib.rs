//! `FreshBasket` backend library.
//!
//! REST backend for a small marketplace/donation app: a product catalog,
//! per-user embedded carts, and immutable order placement over a generic
//! document store.
//!
//! The binary in `main.rs` wires this library to a `PostgreSQL` document
//! store; the integration-tests crate drives the same router against the
//! in-memory store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
