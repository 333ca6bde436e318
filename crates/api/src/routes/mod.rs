pub mod health;
pub mod images;
pub mod products;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /products                          list (filters: date_from, date_to, category)
/// /products/upload                   multipart spreadsheet upload (POST)
/// /products/export                   xlsx export of all products
/// /products/template                 blank xlsx upload template
/// /products/{sku}                    product detail with revenue
/// /products/{sku}/images             list, attach (POST)
///
/// /images/{id}                       delete (DELETE)
///
/// /dashboard                         KPIs and top categories
/// /stats                             monthly, quarterly, category, top SKU, low stock
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/images", images::router())
        .merge(reports::router())
}
