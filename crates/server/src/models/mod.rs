//! Document models stored in and served from the document store.
//!
//! Field names serialize in camelCase to match the document shapes the
//! web frontends already consume.

pub mod order;
pub mod product;
pub mod user;

pub use order::{AdminOrderLine, AdminOrderRow, Order, OrderLineView, OrderView};
pub use product::{NewProduct, Product, ProductEdit};
pub use user::{CartEntry, CartItemView, User};
