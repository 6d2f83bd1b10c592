//! Order route handlers.

use axum::{Json, extract::{Path, State}};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use freshbasket_core::Price;

use crate::error::Result;
use crate::models::{AdminOrderRow, OrderView};
use crate::routes::products::parse_email;
use crate::services::{PlaceOrderOutcome, PlaceOrderRequest};
use crate::state::AppState;

/// Body of the place-order request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderBody {
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub payment_method: String,
    pub total_price: Price,
}

/// POST /orders
///
/// Responds with the created order, or with a 200 `empty_cart` body when
/// there is nothing to order.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn place(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderBody>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;
    let request = PlaceOrderRequest {
        email,
        phone_number: body.phone_number,
        address: body.address,
        payment_method: body.payment_method,
        total_price: body.total_price,
    };

    let outcome = state.orders().place(request).await?;
    let response = match outcome {
        PlaceOrderOutcome::Placed(order) => json!({
            "success": true,
            "order": order,
        }),
        PlaceOrderOutcome::EmptyCart => json!({
            "success": false,
            "error": "empty_cart",
            "message": "Cannot place an order with an empty cart",
        }),
    };
    Ok(Json(response))
}

/// GET /users/{email}/orders
#[instrument(skip(state))]
pub async fn user_orders(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<OrderView>>> {
    let email = parse_email(&email)?;
    let orders = state.enrichment().user_orders(&email).await?;
    Ok(Json(orders))
}

/// GET /orders
#[instrument(skip(state))]
pub async fn all_orders(State(state): State<AppState>) -> Result<Json<Vec<AdminOrderRow>>> {
    let orders = state.enrichment().all_orders().await?;
    Ok(Json(orders))
}
