//! Route definitions for product images, mounted at `/images`.

use axum::routing::delete;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// ```text
/// DELETE /{id}              -> delete_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(images::delete_image))
}
