//! Handlers for the dashboard and statistics reports.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use datalab_db::repositories::ReportRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn dashboard(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let dashboard = ReportRepo::dashboard(&state.pool).await?;
    Ok(Json(DataResponse { data: dashboard }))
}

/// GET /api/v1/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = ReportRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}
