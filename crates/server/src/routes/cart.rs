//! Cart route handlers.
//!
//! Business-rule rejections (out of stock) respond with HTTP 200 and an
//! `error` field rather than a 4xx, which is the convention the web
//! frontends already consume. True failures still use 404/400/500.

use axum::{Json, extract::{Path, State}};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use freshbasket_core::ProductId;

use crate::error::Result;
use crate::models::CartItemView;
use crate::routes::products::parse_email;
use crate::services::AddToCartOutcome;
use crate::state::AppState;

const fn default_quantity() -> i64 {
    1
}

/// Body of the add-to-cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    pub email: String,
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

/// Body of the quantity update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityRequest {
    pub email: String,
    pub product_id: String,
    pub quantity: i64,
}

/// Body of the remove request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    pub email: String,
    pub product_id: String,
}

/// Acknowledgement body for cart mutations.
#[derive(Debug, Serialize)]
pub struct CartAck {
    pub success: bool,
}

/// POST /cart/add
#[instrument(skip(state, body), fields(email = %body.email, product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddRequest>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;
    let product_id = ProductId::new(body.product_id);

    let outcome = state.cart().add(&email, &product_id, body.quantity).await?;
    let response = match outcome {
        AddToCartOutcome::Added => json!({ "success": true }),
        AddToCartOutcome::OutOfStock => json!({
            "success": false,
            "error": "out_of_stock",
            "message": "This item is currently out of stock",
        }),
    };
    Ok(Json(response))
}

/// PATCH /cart/quantity
#[instrument(skip(state, body), fields(email = %body.email, product_id = %body.product_id))]
pub async fn update_quantity(
    State(state): State<AppState>,
    Json(body): Json<QuantityRequest>,
) -> Result<Json<CartAck>> {
    let email = parse_email(&body.email)?;
    let product_id = ProductId::new(body.product_id);

    state
        .cart()
        .update_quantity(&email, &product_id, body.quantity)
        .await?;
    Ok(Json(CartAck { success: true }))
}

/// PATCH /cart/remove
#[instrument(skip(state, body), fields(email = %body.email, product_id = %body.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<RemoveRequest>,
) -> Result<Json<CartAck>> {
    let email = parse_email(&body.email)?;
    let product_id = ProductId::new(body.product_id);

    state.cart().remove(&email, &product_id).await?;
    Ok(Json(CartAck { success: true }))
}

/// GET /users/{email}/cart
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<CartItemView>>> {
    let email = parse_email(&email)?;
    let items = state.cart().cart(&email).await?;
    Ok(Json(items))
}
