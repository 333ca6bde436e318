//! Handlers for reading products.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use datalab_core::error::CoreError;
use datalab_core::reporting::clamp_list_limit;
use datalab_db::models::product::ProductWithRevenue;
use datalab_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::query::ProductListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products
///
/// List products newest transaction first, filtered by an inclusive date
/// range and a case-insensitive category substring.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.filter();
    filter.validate()?;

    let products = ProductRepo::list(
        &state.pool,
        &filter,
        clamp_list_limit(params.limit),
        params.offset.unwrap_or(0),
    )
    .await?;

    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{sku}
///
/// A single product with its derived revenue.
pub async fn get_product(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_sku(&state.pool, &sku)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            key: sku,
        }))?;

    Ok(Json(DataResponse {
        data: ProductWithRevenue::from(product),
    }))
}
