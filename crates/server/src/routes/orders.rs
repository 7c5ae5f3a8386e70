//! Order route handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use storeroom_core::{CustomerId, OrderId, ProductId};

use crate::error::Result;
use crate::models::Order;
use crate::services::ServiceError;
use crate::state::AppState;

/// Purchase request body.
///
/// Ids arrive as strings; an unparseable id is treated the same as a
/// nonexistent record, so the workflow's "invalid product or customer"
/// failure covers both.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub customer_id: String,
    pub product_id: String,
}

/// GET /orders
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.retail().completed_orders().await?))
}

/// GET /orders/overdue
pub async fn overdue(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.retail().overdue_orders().await?))
}

/// GET /orders/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    let order = state.retail().order(parse_order_id(&id)?).await?;
    Ok(Json(order))
}

/// POST /orders
pub async fn purchase(
    State(state): State<AppState>,
    Json(body): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let invalid = || ServiceError::InvalidOperation("invalid product or customer");
    let customer_id: CustomerId = body.customer_id.parse().map_err(|_| invalid())?;
    let product_id: ProductId = body.product_id.parse().map_err(|_| invalid())?;

    let order = state.retail().purchase(customer_id, product_id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /orders/{id}/return
pub async fn return_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let order = state.retail().return_order(parse_order_id(&id)?).await?;
    Ok(Json(order))
}

/// DELETE /orders/{id}
///
/// Administrative path: removes the record without touching stock.
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.retail().delete_order(parse_order_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// An unparseable order id addresses nothing, so it reads as not found.
fn parse_order_id(id: &str) -> Result<OrderId> {
    Ok(id
        .parse()
        .map_err(|_| ServiceError::NotFound("order"))?)
}
