//! Repository for the `products` table.

use datalab_core::product::ProductFields;
use datalab_core::reporting::ProductFilter;
use sqlx::PgPool;

use crate::models::product::Product;

/// Column list for `products` queries.
const COLUMNS: &str = "\
    id, sku, name, category, price, quantity, tx_date, created_at, updated_at";

/// Provides upsert and read access to products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product or overwrite every field of the existing row with the
    /// same SKU. The last write for a SKU wins.
    pub async fn upsert(
        pool: &PgPool,
        sku: &str,
        fields: &ProductFields,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (sku, name, price, quantity, category, tx_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (sku) DO UPDATE SET \
                name = EXCLUDED.name, \
                price = EXCLUDED.price, \
                quantity = EXCLUDED.quantity, \
                category = EXCLUDED.category, \
                tx_date = EXCLUDED.tx_date \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(sku)
            .bind(&fields.name)
            .bind(fields.price)
            .bind(fields.quantity)
            .bind(&fields.category)
            .bind(fields.tx_date)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its SKU.
    pub async fn find_by_sku(pool: &PgPool, sku: &str) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE sku = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(sku)
            .fetch_optional(pool)
            .await
    }

    /// List products matching `filter`, newest transaction first.
    ///
    /// Date bounds are inclusive; the category matches as a case-insensitive
    /// substring.
    pub async fn list(
        pool: &PgPool,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE ($1::DATE IS NULL OR tx_date >= $1) \
               AND ($2::DATE IS NULL OR tx_date <= $2) \
               AND ($3::TEXT IS NULL OR category ILIKE $3) \
             ORDER BY tx_date DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .bind(filter.category_pattern())
            .bind(limit)
            .bind(offset.max(0))
            .fetch_all(pool)
            .await
    }

    /// All products in export order: newest transaction first, then SKU.
    pub async fn list_for_export(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY tx_date DESC, sku");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
