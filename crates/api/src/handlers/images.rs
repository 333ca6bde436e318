//! Handlers for product image references.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use datalab_core::error::CoreError;
use datalab_core::types::DbId;
use datalab_db::models::product::Product;
use datalab_db::models::product_image::CreateProductImage;
use datalab_db::repositories::{ProductImageRepo, ProductRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products/{sku}/images
pub async fn list_images(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<impl IntoResponse> {
    let product = find_product(&state, sku).await?;
    let images = ProductImageRepo::list_for_product(&state.pool, product.id).await?;

    Ok(Json(DataResponse { data: images }))
}

/// POST /api/v1/products/{sku}/images
///
/// Attach an image reference (path or URL) to a product.
pub async fn create_image(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Json(input): Json<CreateProductImage>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let product = find_product(&state, sku).await?;
    let image = ProductImageRepo::create(&state.pool, product.id, &input).await?;

    tracing::info!(image_id = image.id, sku = %product.sku, "Product image attached");

    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}

/// DELETE /api/v1/images/{id}
pub async fn delete_image(
    State(state): State<AppState>,
    Path(image_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProductImageRepo::delete(&state.pool, image_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ProductImage",
            key: image_id.to_string(),
        }));
    }

    tracing::info!(image_id, "Product image deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_product(state: &AppState, sku: String) -> AppResult<Product> {
    ProductRepo::find_by_sku(&state.pool, &sku)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            key: sku,
        }))
}
