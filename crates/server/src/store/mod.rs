//! Document store access.
//!
//! The backend treats storage as a generic document store: schema-less
//! documents keyed by a unique identifier, with per-document atomic
//! updates as the only concurrency primitive. The two traits below are
//! the seam; services receive them as `Arc<dyn …>` capabilities at
//! construction so tests can substitute the in-memory implementation.
//!
//! Implementations:
//!
//! - [`postgres::PgStore`] - documents in `JSONB` columns, one table per
//!   collection. Every mutation is a single SQL statement so row-level
//!   atomicity covers the order-append + cart-clear invariant.
//! - [`memory::MemoryStore`] - mutex-guarded vectors, used by the test
//!   suites and as the local development mode when no database is
//!   configured.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use freshbasket_core::{Email, ProductId};

use crate::models::{CartEntry, Order, Product, ProductEdit, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying store could not be reached or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    /// A stored document does not deserialize into its model.
    #[error("document corruption: {0}")]
    Corruption(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD over the `products` collection.
///
/// Listing returns documents in store order with no pagination; filtering
/// and sorting happen in the catalog service over the full scan.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// All product documents, in store order.
    async fn list(&self) -> StoreResult<Vec<Product>>;

    /// A single product by id.
    async fn get(&self, id: &ProductId) -> StoreResult<Option<Product>>;

    /// All products matching any of the given ids, in one round trip.
    async fn get_many(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>>;

    /// Insert a new product document.
    async fn insert(&self, product: Product) -> StoreResult<Product>;

    /// Replace the enumerated editable fields, upsert-creating the
    /// document when the id is absent. Returns whether an existing
    /// document was modified (false when the document was created).
    async fn update_fields(&self, id: &ProductId, edit: &ProductEdit) -> StoreResult<bool>;

    /// Delete a product. Returns whether a document was removed.
    async fn delete(&self, id: &ProductId) -> StoreResult<bool>;

    /// Update only the stock flag. Returns the affected-document count;
    /// an unknown id affects zero documents and creates nothing.
    async fn set_stock(&self, id: &ProductId, in_stock: bool) -> StoreResult<u64>;
}

/// Document-level mutations over the `users` collection.
///
/// Each mutation is one document-level update so a crash between two
/// logical steps is never observable. The cart manager is the only
/// caller of the cart mutations; order placement is the only caller of
/// [`UserStore::append_order_and_clear_cart`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// A single user document by email.
    async fn get(&self, email: &Email) -> StoreResult<Option<User>>;

    /// Every user document, in store order.
    async fn all(&self) -> StoreResult<Vec<User>>;

    /// Append a cart entry, creating the user document on first use.
    async fn push_cart_entry(&self, email: &Email, entry: &CartEntry) -> StoreResult<()>;

    /// Add `delta` to the quantity of every entry matching `product_id`
    /// (duplicates exist under the append cart policy), saturating at
    /// the `u32` ceiling. Returns the affected-document count (zero when
    /// no entry matches).
    async fn increment_cart_quantity(
        &self,
        email: &Email,
        product_id: &ProductId,
        delta: u32,
    ) -> StoreResult<u64>;

    /// Set the quantity of every entry matching `product_id` in place.
    /// Returns the affected-document count (zero when no entry matches).
    async fn set_cart_quantity(
        &self,
        email: &Email,
        product_id: &ProductId,
        quantity: u32,
    ) -> StoreResult<u64>;

    /// Remove every cart entry matching `product_id`. Returns the
    /// affected-document count; removing a non-existent entry is a no-op.
    async fn pull_cart_entries(&self, email: &Email, product_id: &ProductId) -> StoreResult<u64>;

    /// Append `order` to the user's order history and clear the cart in
    /// the same document update. The two mutations are one write: a
    /// half-applied state must never be observable.
    async fn append_order_and_clear_cart(&self, email: &Email, order: &Order) -> StoreResult<()>;
}
