//! Repository for the `product_images` table.

use datalab_core::types::DbId;
use sqlx::PgPool;

use crate::models::product_image::{CreateProductImage, ProductImage};

/// Column list for `product_images` queries.
const COLUMNS: &str = "id, product_id, image, alt, created_at, updated_at";

/// Provides CRUD operations for product images.
pub struct ProductImageRepo;

impl ProductImageRepo {
    /// Attach an image reference to a product. A missing `alt` is stored as `''`.
    pub async fn create(
        pool: &PgPool,
        product_id: DbId,
        input: &CreateProductImage,
    ) -> Result<ProductImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_images (product_id, image, alt) \
             VALUES ($1, $2, COALESCE($3, '')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(product_id)
            .bind(input.image.as_deref())
            .bind(input.alt.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Images of one product, oldest first.
    pub async fn list_for_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<ProductImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_images WHERE product_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an image. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM product_images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
