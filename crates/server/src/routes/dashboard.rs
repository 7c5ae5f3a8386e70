//! Dashboard route handler.

use axum::extract::State;
use axum::Json;

use crate::error::Result;
use crate::services::DashboardStats;
use crate::state::AppState;

/// GET /dashboard
pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>> {
    Ok(Json(state.retail().dashboard_stats().await?))
}
