//! Customer route handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use storeroom_core::CustomerId;

use crate::error::Result;
use crate::models::{Customer, NewCustomer, UpdateCustomer};
use crate::routes::MultipartForm;
use crate::services::ServiceError;
use crate::state::AppState;

/// An unparseable customer id addresses nothing, so it reads as not found.
fn parse_id(id: &str) -> Result<CustomerId> {
    Ok(id.parse().map_err(|_| ServiceError::NotFound("customer"))?)
}

/// GET /customers
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    Ok(Json(state.retail().customers().await?))
}

/// POST /customers
///
/// Multipart form: `first_name`, `last_name`, `email`, `phone`, optional
/// `id_image` file.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Customer>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let new_customer = NewCustomer {
        first_name: form.field("first_name")?.to_owned(),
        last_name: form.field("last_name")?.to_owned(),
        email: form.field("email")?.to_owned(),
        phone: form.field("phone")?.to_owned(),
    };
    let id_image = form.take_file("id_image");

    let customer = state.retail().add_customer(new_customer, id_image).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /customers/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>> {
    let customer = state.retail().customer(parse_id(&id)?).await?;
    Ok(Json(customer))
}

/// PUT /customers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCustomer>,
) -> Result<Json<Customer>> {
    let customer = state.retail().update_customer(parse_id(&id)?, body).await?;
    Ok(Json(customer))
}

/// DELETE /customers/{id}
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.retail().delete_customer(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
