//! Product image model and DTOs.

use datalab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `product_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductImage {
    pub id: DbId,
    pub product_id: DbId,
    /// Stored path or URL of the image, if any.
    pub image: Option<String>,
    pub alt: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for attaching an image reference to a product.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductImage {
    #[validate(length(max = 1024))]
    pub image: Option<String>,
    #[validate(length(max = 200))]
    pub alt: Option<String>,
}
