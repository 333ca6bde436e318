//! PostgreSQL implementation of the upload pipeline's persistence seam.

use async_trait::async_trait;
use datalab_core::ingest::{PersistenceError, ProductSink};
use datalab_core::product::ProductFields;
use sqlx::PgPool;

use crate::repositories::ProductRepo;

/// Upserts normalized rows into `products`, one statement per row.
#[derive(Debug, Clone)]
pub struct PgProductSink {
    pool: PgPool,
}

impl PgProductSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductSink for PgProductSink {
    async fn upsert(&self, sku: &str, fields: &ProductFields) -> Result<(), PersistenceError> {
        ProductRepo::upsert(&self.pool, sku, fields)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::error!(sku, error = %e, "Product upsert failed");
                PersistenceError(e.to_string())
            })
    }
}
