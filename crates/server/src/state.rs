//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{CartManager, Catalog, OrderEnrichment, OrderPlacement};
use crate::store::{ProductStore, UserStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Services receive their store
/// capabilities here, at construction, rather than reading a
/// process-wide handle.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Catalog,
    cart: CartManager,
    orders: OrderPlacement,
    enrichment: OrderEnrichment,
    products: Arc<dyn ProductStore>,
}

impl AppState {
    /// Create a new application state over the given store capabilities.
    /// The configuration is consumed here; services hold the pieces they
    /// need (currently just the cart policy).
    #[must_use]
    pub fn new(
        config: &ServerConfig,
        products: Arc<dyn ProductStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        let catalog = Catalog::new(products.clone());
        let cart = CartManager::new(products.clone(), users.clone(), config.cart_policy);
        let orders = OrderPlacement::new(users.clone());
        let enrichment = OrderEnrichment::new(products.clone(), users);

        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                cart,
                orders,
                enrichment,
                products,
            }),
        }
    }

    /// Get a reference to the catalog accessor.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart manager.
    #[must_use]
    pub fn cart(&self) -> &CartManager {
        &self.inner.cart
    }

    /// Get a reference to the order placement service.
    #[must_use]
    pub fn orders(&self) -> &OrderPlacement {
        &self.inner.orders
    }

    /// Get a reference to the order enrichment service.
    #[must_use]
    pub fn enrichment(&self) -> &OrderEnrichment {
        &self.inner.enrichment
    }

    /// Get the product store handle (used by the readiness probe).
    #[must_use]
    pub fn products(&self) -> &Arc<dyn ProductStore> {
        &self.inner.products
    }
}
