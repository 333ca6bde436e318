//! Route definitions for reports, merged at the `/api/v1` root.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// ```text
/// GET    /dashboard         -> dashboard
/// GET    /stats             -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(reports::dashboard))
        .route("/stats", get(reports::stats))
}
