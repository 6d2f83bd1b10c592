//! HTTP route handlers for the backend.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Store readiness check
//!
//! # Products
//! GET    /products                - Listing (?search=&category=&sort=)
//! POST   /products                - Create
//! GET    /products/best-sellers   - Highest rated
//! GET    /products/featured       - Highest quantity
//! GET    /products/{id}           - Detail (404 on miss)
//! PUT    /products/{id}           - Edit enumerated fields (upsert)
//! DELETE /products/{id}           - Delete
//! PATCH  /products/{id}/stock     - Update the stock flag only
//! GET    /products/{id}/related   - Same-category products
//!
//! # Cart
//! POST   /cart/add                - Add to cart ({email, productId, quantity?})
//! PATCH  /cart/quantity           - Set entry quantity
//! PATCH  /cart/remove             - Remove entry (idempotent)
//!
//! # Orders
//! POST   /orders                  - Place order from cart
//! GET    /orders                  - Admin: all orders, flattened
//!
//! # Per-user views
//! GET    /users/{email}/cart      - Enriched cart
//! GET    /users/{email}/orders    - Enriched order history
//! GET    /users/{email}/products  - Products listed by the user
//! ```

pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/best-sellers", get(products::best_sellers))
        .route("/featured", get(products::featured))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/{id}/stock", patch(products::set_stock))
        .route("/{id}/related", get(products::related))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/quantity", patch(cart::update_quantity))
        .route("/remove", patch(cart::remove))
}

/// Create the per-user view routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/{email}/cart", get(cart::show))
        .route("/{email}/orders", get(orders::user_orders))
        .route("/{email}/products", get(products::by_owner))
}

/// Create all routes for the backend.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/users", user_routes())
        .route("/orders", post(orders::place).get(orders::all_orders))
}
