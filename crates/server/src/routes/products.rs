//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use freshbasket_core::{Email, ProductId};

use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductEdit};
use crate::services::ProductFilter;
use crate::services::catalog::{BEST_SELLERS_LIMIT, FEATURED_LIMIT, RELATED_LIMIT};
use crate::state::AppState;

/// Query parameters accepted by the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    /// `"true"` or `"expiry"` selects the expiry-descending sort.
    pub sort: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> ProductFilter {
        let sort_by_expiry_desc = self
            .sort
            .as_deref()
            .is_some_and(|s| s == "true" || s == "expiry");
        ProductFilter {
            search: self.search,
            category: self.category,
            sort_by_expiry_desc,
        }
    }
}

/// GET /products
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().list(&query.into_filter()).await?;
    Ok(Json(products))
}

/// GET /products/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = state.catalog().get(&ProductId::new(id)).await?;
    Ok(Json(product))
}

/// POST /products
#[instrument(skip(state, new))]
pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewProduct>,
) -> Result<Response> {
    let product = state.catalog().create(new).await?;
    Ok((StatusCode::CREATED, Json(product)).into_response())
}

/// Body of the edit acknowledgement: mirrors the driver-style result the
/// frontends already inspect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteAck {
    pub acknowledged: bool,
    pub modified_count: u64,
}

/// PUT /products/{id}
///
/// Replaces the enumerated editable fields; upsert-creates the document
/// when the id is unknown.
#[instrument(skip(state, edit))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edit): Json<ProductEdit>,
) -> Result<Json<WriteAck>> {
    let modified = state.catalog().update(&ProductId::new(id), &edit).await?;
    Ok(Json(WriteAck {
        acknowledged: true,
        modified_count: u64::from(modified),
    }))
}

/// DELETE /products/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>> {
    let deleted = state.catalog().delete(&ProductId::new(id)).await?;
    Ok(Json(DeleteAck {
        acknowledged: true,
        deleted_count: u64::from(deleted),
    }))
}

/// Body of the delete acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Body of the stock update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub in_stock: bool,
}

/// Body of the stock update acknowledgement. Callers inspect
/// `matchedCount` to detect an unknown id (the operation itself never
/// fails on one).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAck {
    pub acknowledged: bool,
    pub matched_count: u64,
}

/// PATCH /products/{id}/stock
#[instrument(skip(state))]
pub async fn set_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StockUpdate>,
) -> Result<Json<StockAck>> {
    let matched = state
        .catalog()
        .set_stock(&ProductId::new(id), update.in_stock)
        .await?;
    Ok(Json(StockAck {
        acknowledged: true,
        matched_count: matched,
    }))
}

/// GET /products/best-sellers
#[instrument(skip(state))]
pub async fn best_sellers(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().best_sellers(BEST_SELLERS_LIMIT).await?;
    Ok(Json(products))
}

/// GET /products/featured
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().featured(FEATURED_LIMIT).await?;
    Ok(Json(products))
}

/// GET /products/{id}/related
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .catalog()
        .related(&ProductId::new(id), RELATED_LIMIT)
        .await?;
    Ok(Json(products))
}

/// GET /users/{email}/products
#[instrument(skip(state))]
pub async fn by_owner(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let email = parse_email(&email)?;
    let products = state.catalog().list_by_owner(&email).await?;
    Ok(Json(products))
}

pub(crate) fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::InvalidArgument(format!("email: {e}")))
}
