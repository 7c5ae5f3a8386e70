//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Health check
//!
//! # Customers
//! GET    /customers               - List customers
//! POST   /customers               - Register (multipart, optional id_image)
//! GET    /customers/{id}          - Customer detail
//! PUT    /customers/{id}          - Update contact fields (JSON)
//! DELETE /customers/{id}          - Delete customer
//!
//! # Products
//! GET    /products                - List products
//! POST   /products                - Create (multipart, optional image)
//! GET    /products/{id}           - Product detail
//! PUT    /products/{id}           - Update (multipart, optional image)
//! DELETE /products/{id}           - Delete product (and its image blob)
//!
//! # Orders
//! GET    /orders                  - List completed orders
//! GET    /orders/overdue          - Completed orders older than 30 days
//! POST   /orders                  - Purchase (JSON: customer_id, product_id)
//! GET    /orders/{id}             - Order detail
//! POST   /orders/{id}/return      - Return a completed order
//! DELETE /orders/{id}             - Administrative delete (bypasses workflow)
//!
//! # Activity feed
//! GET    /activities?limit=N      - Recent activity messages
//!
//! # Documents and contracts
//! GET    /documents               - List documents
//! POST   /documents               - Upload (multipart)
//! GET    /documents/{name}        - Download
//! GET    /contracts               - List contracts
//! POST   /contracts               - Upload (multipart, PDF only)
//! GET    /contracts/{name}        - Download
//!
//! # Dashboard
//! GET    /dashboard               - Summary statistics
//! ```

pub mod activities;
pub mod customers;
pub mod dashboard;
pub mod documents;
pub mod orders;
pub mod products;

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::services::Upload;
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::remove),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/orders", get(orders::list).post(orders::purchase))
        .route("/orders/overdue", get(orders::overdue))
        .route(
            "/orders/{id}",
            get(orders::show).delete(orders::remove),
        )
        .route("/orders/{id}/return", post(orders::return_order))
        .route("/activities", get(activities::list))
        .route(
            "/documents",
            get(documents::list_documents).post(documents::upload_document),
        )
        .route("/documents/{name}", get(documents::download_document))
        .route(
            "/contracts",
            get(documents::list_contracts).post(documents::upload_contract),
        )
        .route("/contracts/{name}", get(documents::download_contract))
        .route("/dashboard", get(dashboard::stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// A parsed multipart request: text fields plus file parts.
pub(crate) struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl MultipartForm {
    /// Drain a multipart request into fields and files.
    pub(crate) async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut fields = HashMap::new();
        let mut files = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(ToOwned::to_owned) else {
                continue;
            };
            if let Some(file_name) = field.file_name().map(ToOwned::to_owned) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                files.insert(
                    name,
                    Upload {
                        file_name,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                fields.insert(name, text);
            }
        }
        Ok(Self { fields, files })
    }

    /// A required text field.
    pub(crate) fn field(&self, name: &str) -> Result<&str, AppError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::BadRequest(format!("missing field `{name}`")))
    }

    /// A required text field parsed into `T`.
    pub(crate) fn parsed_field<T: std::str::FromStr>(&self, name: &str) -> Result<T, AppError> {
        self.field(name)?
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid field `{name}`")))
    }

    /// Take a file part by field name, if present.
    pub(crate) fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}
