//! Business services over the document store.
//!
//! Each service receives its store capabilities at construction
//! (dependency injection, no process-wide store handle) so the test
//! suites can substitute [`crate::store::MemoryStore`].

pub mod cart;
pub mod catalog;
pub mod enrichment;
pub mod orders;

pub use cart::{AddToCartOutcome, CartManager, CartPolicy};
pub use catalog::{Catalog, ProductFilter};
pub use enrichment::OrderEnrichment;
pub use orders::{OrderPlacement, PlaceOrderOutcome, PlaceOrderRequest};
