//! Cart manager: owns the embedded-cart invariant inside a user document.
//!
//! The cart maps product id to quantity uniquely. Under the default
//! [`CartPolicy::Merge`], a repeated add for the same product folds its
//! quantity into the existing entry instead of creating a duplicate.
//! [`CartPolicy::Append`] reproduces the legacy always-append behavior
//! for deployments that depend on it.

use std::sync::Arc;

use tracing::instrument;

use freshbasket_core::{Email, ProductId};

use crate::error::{AppError, Result};
use crate::models::{CartEntry, CartItemView};
use crate::store::{ProductStore, UserStore};

/// What a repeated add-to-cart for the same product does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartPolicy {
    /// Fold the quantity into the existing entry (one entry per product).
    #[default]
    Merge,
    /// Always append a new entry (legacy behavior).
    Append,
}

/// Outcome of an add-to-cart request.
///
/// `OutOfStock` is an expected business condition, not an error; the
/// HTTP layer renders it as a 200 with an `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartOutcome {
    Added,
    OutOfStock,
}

/// The only writer of a user's `cartItems` sequence.
#[derive(Clone)]
pub struct CartManager {
    products: Arc<dyn ProductStore>,
    users: Arc<dyn UserStore>,
    policy: CartPolicy,
}

impl CartManager {
    /// Create a new cart manager with the given duplicate-add policy.
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductStore>,
        users: Arc<dyn UserStore>,
        policy: CartPolicy,
    ) -> Self {
        Self {
            products,
            users,
            policy,
        }
    }

    /// Add a product to the user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the product does not exist and
    /// [`AppError::InvalidArgument`] for a non-positive quantity.
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        email: &Email,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<AddToCartOutcome> {
        let quantity = validate_quantity(quantity)?;

        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

        if !product.in_stock {
            return Ok(AddToCartOutcome::OutOfStock);
        }

        let entry = CartEntry {
            product_id: product_id.clone(),
            quantity,
        };

        match self.policy {
            CartPolicy::Merge => {
                // Try to fold into an existing entry first; fall back to
                // a push when no entry matched.
                let affected = self
                    .users
                    .increment_cart_quantity(email, product_id, quantity)
                    .await?;
                if affected == 0 {
                    self.users.push_cart_entry(email, &entry).await?;
                }
            }
            CartPolicy::Append => {
                self.users.push_cart_entry(email, &entry).await?;
            }
        }

        Ok(AddToCartOutcome::Added)
    }

    /// Set the quantity of the matching cart entry in place.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] for a non-positive quantity
    /// and [`AppError::NotFound`] when no entry matches.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        email: &Email,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<()> {
        let quantity = validate_quantity(quantity)?;

        let affected = self
            .users
            .set_cart_quantity(email, product_id, quantity)
            .await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "cart entry for product {product_id}"
            )));
        }
        Ok(())
    }

    /// Remove all entries matching the product. Idempotent: removing a
    /// non-existent entry succeeds with no effect.
    #[instrument(skip(self))]
    pub async fn remove(&self, email: &Email, product_id: &ProductId) -> Result<()> {
        self.users.pull_cart_entries(email, product_id).await?;
        Ok(())
    }

    /// The user's cart joined against current product data.
    ///
    /// Entries whose product no longer exists are dropped from the
    /// result rather than failing the whole call. An unknown user has an
    /// empty cart.
    #[instrument(skip(self))]
    pub async fn cart(&self, email: &Email) -> Result<Vec<CartItemView>> {
        let Some(user) = self.users.get(email).await? else {
            return Ok(Vec::new());
        };

        let ids: Vec<ProductId> = user
            .cart_items
            .iter()
            .map(|e| e.product_id.clone())
            .collect();
        let products = self.products.get_many(&ids).await?;

        Ok(user
            .cart_items
            .into_iter()
            .filter_map(|entry| {
                let product = products.iter().find(|p| p.id == entry.product_id)?;
                Some(CartItemView {
                    product_id: product.id.clone(),
                    food_name: product.food_name.clone(),
                    price: product.price,
                    image_url: product.image_url.clone(),
                    in_stock: product.in_stock,
                    quantity: entry.quantity,
                })
            })
            .collect())
    }
}

fn validate_quantity(quantity: i64) -> Result<u32> {
    if quantity < 1 {
        return Err(AppError::InvalidArgument(
            "quantity must be a positive integer".to_owned(),
        ));
    }
    u32::try_from(quantity)
        .map_err(|_| AppError::InvalidArgument("quantity out of range".to_owned()))
}
