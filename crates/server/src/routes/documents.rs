//! Document and contract route handlers.
//!
//! Both are file shares behind the same storage trait; contracts
//! additionally enforce a PDF-only upload policy.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, Result};
use crate::routes::MultipartForm;
use crate::services::Upload;
use crate::state::AppState;

async fn file_from(multipart: Multipart) -> Result<Upload> {
    let mut form = MultipartForm::read(multipart).await?;
    form.take_file("file")
        .ok_or_else(|| AppError::BadRequest("missing file part `file`".to_owned()))
}

fn download_response(name: &str, bytes: Vec<u8>) -> impl IntoResponse + use<> {
    let content_type = mime_guess::from_path(name).first_or_octet_stream();
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        bytes,
    )
}

/// GET /documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.retail().documents().await?))
}

/// POST /documents
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<StatusCode> {
    let file = file_from(multipart).await?;
    state.retail().upload_document(file).await?;
    Ok(StatusCode::CREATED)
}

/// GET /documents/{name}
pub async fn download_document(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = state.retail().download_document(&name).await?;
    Ok(download_response(&name, bytes))
}

/// GET /contracts
pub async fn list_contracts(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.retail().contracts().await?))
}

/// POST /contracts
///
/// Only PDF files are accepted.
pub async fn upload_contract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<StatusCode> {
    let file = file_from(multipart).await?;
    if !file.file_name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(AppError::BadRequest(
            "please select a valid PDF file".to_owned(),
        ));
    }
    state.retail().upload_contract(file).await?;
    Ok(StatusCode::CREATED)
}

/// GET /contracts/{name}
pub async fn download_contract(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = state.retail().download_contract(&name).await?;
    Ok(download_response(&name, bytes))
}
