//! Read-heavy lookups and filtered listing over the `products` collection.
//!
//! Listing operations are full scans filtered and sorted in memory.
//! Acceptable at this scope; a scaling limit, not a correctness issue.

use std::sync::Arc;

use tracing::instrument;

use freshbasket_core::{Email, ProductId};

use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductEdit};
use crate::store::ProductStore;

/// Default result size for the best-sellers view.
pub const BEST_SELLERS_LIMIT: usize = 10;
/// Default result size for the related-products view.
pub const RELATED_LIMIT: usize = 5;
/// Default result size for the featured view.
pub const FEATURED_LIMIT: usize = 6;

/// Category query value sent by frontends when no category is selected.
const CATEGORY_SENTINEL: &str = "undefined";

/// Listing filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the food name.
    pub search: Option<String>,
    /// Exact case-insensitive category match. The literal string
    /// `"undefined"` is treated as absent.
    pub category: Option<String>,
    /// Order results by expiry date descending instead of store order.
    pub sort_by_expiry_desc: bool,
}

/// Catalog accessor: the only writer of the `products` collection.
#[derive(Clone)]
pub struct Catalog {
    products: Arc<dyn ProductStore>,
}

impl Catalog {
    /// Create a new catalog over the given product store.
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// List products matching `filter`, in store order unless sorted.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let mut products = self.products.list().await?;

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            products.retain(|p| p.food_name.to_lowercase().contains(&needle));
        }

        if let Some(category) = filter
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != CATEGORY_SENTINEL)
        {
            products.retain(|p| p.category.eq_ignore_ascii_case(category));
        }

        if filter.sort_by_expiry_desc {
            products.sort_by(|a, b| b.expire_date.cmp(&a.expire_date));
        }

        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no product matches.
    pub async fn get(&self, id: &ProductId) -> Result<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))
    }

    /// Products ordered by rating descending, truncated to `limit`.
    pub async fn best_sellers(&self, limit: usize) -> Result<Vec<Product>> {
        let mut products = self.products.list().await?;
        products.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        products.truncate(limit);
        Ok(products)
    }

    /// Products sharing the category of `id`'s product, excluding `id`
    /// itself, truncated to `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when `id` does not resolve.
    pub async fn related(&self, id: &ProductId, limit: usize) -> Result<Vec<Product>> {
        let anchor = self.get(id).await?;
        let mut products = self.products.list().await?;
        products.retain(|p| p.id != anchor.id && p.category.eq_ignore_ascii_case(&anchor.category));
        products.truncate(limit);
        Ok(products)
    }

    /// Products ordered by quantity descending, truncated to `limit`.
    pub async fn featured(&self, limit: usize) -> Result<Vec<Product>> {
        let mut products = self.products.list().await?;
        products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        products.truncate(limit);
        Ok(products)
    }

    /// Products listed by the given owner.
    pub async fn list_by_owner(&self, email: &Email) -> Result<Vec<Product>> {
        let mut products = self.products.list().await?;
        products.retain(|p| p.user_email.as_ref() == Some(email));
        Ok(products)
    }

    /// Create a new product under a freshly generated id.
    #[instrument(skip(self, new))]
    pub async fn create(&self, new: NewProduct) -> Result<Product> {
        let product = new.into_product(ProductId::generate());
        Ok(self.products.insert(product).await?)
    }

    /// Replace the enumerated editable fields, upsert-creating the
    /// document when `id` is absent. Returns whether an existing
    /// document was modified (false when the edit created one).
    #[instrument(skip(self, edit))]
    pub async fn update(&self, id: &ProductId, edit: &ProductEdit) -> Result<bool> {
        Ok(self.products.update_fields(id, edit).await?)
    }

    /// Delete a product. Returns whether a document was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<bool> {
        Ok(self.products.delete(id).await?)
    }

    /// Update only the stock flag. Returns the affected-document count;
    /// callers inspect it to detect an unknown id (no error is raised).
    #[instrument(skip(self))]
    pub async fn set_stock(&self, id: &ProductId, in_stock: bool) -> Result<u64> {
        Ok(self.products.set_stock(id, in_stock).await?)
    }
}
