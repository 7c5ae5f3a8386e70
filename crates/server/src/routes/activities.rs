//! Activity feed route handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for the activity feed.
#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    /// Maximum number of messages; defaults to the configured feed size.
    pub limit: Option<usize>,
}

/// GET /activities
///
/// Always succeeds: a queue outage yields a placeholder line, never an
/// error response.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ActivityParams>,
) -> Json<Vec<String>> {
    let limit = params.limit.unwrap_or(state.config().activity_limit);
    Json(state.retail().recent_activities(limit).await)
}
