//! Aggregate queries behind the dashboard and statistics reports.
//!
//! Revenue is always `price * quantity` summed in SQL; averages are rounded
//! to two places to match the price scale.

use datalab_core::reporting::{
    LOW_STOCK_LIMIT, LOW_STOCK_THRESHOLD, TOP_CATEGORY_LIMIT, TOP_SKU_LIMIT,
};
use sqlx::PgPool;

use crate::models::report::{
    CategoryRevenue, CategoryStats, Dashboard, DashboardKpis, LowStockItem, MonthlyRevenue,
    QuarterlyRevenue, StatsReport, TopSku,
};

/// Read-only reporting queries over `products`.
pub struct ReportRepo;

impl ReportRepo {
    // -----------------------------------------------------------------------
    // Dashboard
    // -----------------------------------------------------------------------

    /// KPIs plus the top categories by revenue.
    pub async fn dashboard(pool: &PgPool) -> Result<Dashboard, sqlx::Error> {
        Ok(Dashboard {
            kpis: Self::kpis(pool).await?,
            top_categories: Self::top_categories(pool, TOP_CATEGORY_LIMIT).await?,
        })
    }

    pub async fn kpis(pool: &PgPool) -> Result<DashboardKpis, sqlx::Error> {
        sqlx::query_as::<_, DashboardKpis>(
            "SELECT COUNT(*)::BIGINT AS product_count, \
                    COALESCE(SUM(quantity), 0)::BIGINT AS total_quantity, \
                    ROUND(AVG(price), 2) AS avg_price \
             FROM products",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn top_categories(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<CategoryRevenue>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRevenue>(
            "SELECT category, \
                    SUM(price * quantity) AS revenue, \
                    COUNT(*)::BIGINT AS items \
             FROM products \
             GROUP BY category \
             ORDER BY revenue DESC, category \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Every statistics section in one payload.
    pub async fn stats(pool: &PgPool) -> Result<StatsReport, sqlx::Error> {
        Ok(StatsReport {
            monthly: Self::monthly(pool).await?,
            quarterly: Self::quarterly(pool).await?,
            by_category: Self::by_category(pool).await?,
            top_skus: Self::top_skus(pool, TOP_SKU_LIMIT).await?,
            low_stock: Self::low_stock(pool, LOW_STOCK_THRESHOLD, LOW_STOCK_LIMIT).await?,
        })
    }

    pub async fn monthly(pool: &PgPool) -> Result<Vec<MonthlyRevenue>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyRevenue>(
            "SELECT DATE_TRUNC('month', tx_date)::DATE AS month, \
                    SUM(price * quantity) AS revenue, \
                    COUNT(*)::BIGINT AS items \
             FROM products \
             GROUP BY 1 \
             ORDER BY 1",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn quarterly(pool: &PgPool) -> Result<Vec<QuarterlyRevenue>, sqlx::Error> {
        sqlx::query_as::<_, QuarterlyRevenue>(
            "SELECT EXTRACT(YEAR FROM tx_date)::INT4 AS year, \
                    EXTRACT(QUARTER FROM tx_date)::INT4 AS quarter, \
                    SUM(price * quantity) AS revenue, \
                    ROUND(AVG(price), 2) AS avg_price \
             FROM products \
             GROUP BY 1, 2 \
             ORDER BY 1, 2",
        )
        .fetch_all(pool)
        .await
    }

    /// Per-category mean price and units, most units first.
    pub async fn by_category(pool: &PgPool) -> Result<Vec<CategoryStats>, sqlx::Error> {
        sqlx::query_as::<_, CategoryStats>(
            "SELECT category, \
                    ROUND(AVG(price), 2) AS mean_price, \
                    SUM(quantity)::BIGINT AS total_qty \
             FROM products \
             GROUP BY category \
             ORDER BY total_qty DESC, category",
        )
        .fetch_all(pool)
        .await
    }

    /// Highest-revenue products. SKUs are unique, so each row is one product.
    pub async fn top_skus(pool: &PgPool, limit: i64) -> Result<Vec<TopSku>, sqlx::Error> {
        sqlx::query_as::<_, TopSku>(
            "SELECT sku, name, category, \
                    price * quantity AS revenue, \
                    quantity::BIGINT AS qty \
             FROM products \
             ORDER BY revenue DESC, sku \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Products with `quantity <= threshold`, scarcest first.
    pub async fn low_stock(
        pool: &PgPool,
        threshold: i32,
        limit: i64,
    ) -> Result<Vec<LowStockItem>, sqlx::Error> {
        sqlx::query_as::<_, LowStockItem>(
            "SELECT sku, name, quantity \
             FROM products \
             WHERE quantity <= $1 \
             ORDER BY quantity, name \
             LIMIT $2",
        )
        .bind(threshold)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
