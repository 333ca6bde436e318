//! Route definitions for products, mounted at `/products`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{export, images, products, upload};
use crate::state::AppState;

/// ```text
/// GET    /                  -> list_products
/// POST   /upload            -> upload_products
/// GET    /export            -> export_products
/// GET    /template          -> download_template
/// GET    /{sku}             -> get_product
/// GET    /{sku}/images      -> list_images
/// POST   /{sku}/images      -> create_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_products))
        .route("/upload", post(upload::upload_products))
        .route("/export", get(export::export_products))
        .route("/template", get(export::download_template))
        .route("/{sku}", get(products::get_product))
        .route(
            "/{sku}/images",
            get(images::list_images).post(images::create_image),
        )
}
