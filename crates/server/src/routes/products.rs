//! Product route handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use storeroom_core::ProductId;

use crate::error::Result;
use crate::models::{Product, ProductForm};
use crate::routes::MultipartForm;
use crate::services::ServiceError;
use crate::state::AppState;

/// An unparseable product id addresses nothing, so it reads as not found.
fn parse_id(id: &str) -> Result<ProductId> {
    Ok(id.parse().map_err(|_| ServiceError::NotFound("product"))?)
}

fn product_form(form: &MultipartForm) -> Result<ProductForm> {
    Ok(ProductForm {
        name: form.field("name")?.to_owned(),
        description: form.field("description").unwrap_or_default().to_owned(),
        price: form.parsed_field("price")?,
        stock_quantity: form.parsed_field("stock_quantity")?,
        category: form.field("category").unwrap_or_default().to_owned(),
    })
}

/// GET /products
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.retail().products().await?))
}

/// POST /products
///
/// Multipart form: `name`, `price`, `stock_quantity`, optional
/// `description`, `category` and `image` file.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let product_form = product_form(&form)?;
    let image = form.take_file("image");

    let product = state.retail().add_product(product_form, image).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let product = state.retail().product(parse_id(&id)?).await?;
    Ok(Json(product))
}

/// PUT /products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let mut form = MultipartForm::read(multipart).await?;
    let product_form = product_form(&form)?;
    let image = form.take_file("image");

    let product = state
        .retail()
        .update_product(parse_id(&id)?, product_form, image)
        .await?;
    Ok(Json(product))
}

/// DELETE /products/{id}
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.retail().delete_product(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
