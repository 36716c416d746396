//! # Analytics Repository
//!
//! Sales, profit and ranking reports over a date range.
//!
//! All aggregation is delegated to grouped SQL: SQLite sums the cents, Rust
//! only shapes the rows. There is no separate aggregation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use vend_core::Money;

// =============================================================================
// Report Rows
// =============================================================================

/// Sales summary for a date range.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalesSummary {
    /// Sum of invoice totals in the range.
    pub total_cents: i64,
    /// Number of invoices.
    pub invoice_count: i64,
    /// Average invoice value (integer cents, truncated).
    pub average_cents: i64,
    /// Sum of paid invoice totals.
    pub paid_cents: i64,
    /// Sum of unpaid (credit) invoice totals.
    pub unpaid_cents: i64,
}

impl SalesSummary {
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    pub fn is_empty(&self) -> bool {
        self.invoice_count == 0
    }
}

/// Revenue/cost/profit summary for a date range.
///
/// Cost of goods is quantity × the product's CURRENT cost price: the
/// original records never freeze cost at sale time, so neither does this.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfitSummary {
    pub revenue_cents: i64,
    pub cost_cents: i64,
    pub profit_cents: i64,
}

impl ProfitSummary {
    /// Profit as a percentage of revenue, when there is any revenue.
    pub fn margin_percent(&self) -> Option<f64> {
        if self.revenue_cents > 0 {
            Some(self.profit_cents as f64 / self.revenue_cents as f64 * 100.0)
        } else {
            None
        }
    }
}

/// One row of the products-by-quantity ranking.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub barcode: Option<String>,
    pub total_quantity: i64,
    pub total_cents: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sales analytics queries.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// Sales totals over an inclusive date range.
    pub async fn sales_summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<SalesSummary> {
        debug!(%start, %end, "Computing sales summary");

        let summary = sqlx::query_as::<_, SalesSummary>(
            "SELECT \
                COALESCE(SUM(total_cents), 0) AS total_cents, \
                COUNT(id) AS invoice_count, \
                CAST(COALESCE(AVG(total_cents), 0) AS INTEGER) AS average_cents, \
                COALESCE(SUM(CASE WHEN paid = 1 THEN total_cents ELSE 0 END), 0) AS paid_cents, \
                COALESCE(SUM(CASE WHEN paid = 0 THEN total_cents ELSE 0 END), 0) AS unpaid_cents \
             FROM invoices \
             WHERE date BETWEEN ?1 AND ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Revenue, cost of goods and profit over an inclusive date range.
    pub async fn profit_summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<ProfitSummary> {
        debug!(%start, %end, "Computing profit summary");

        let summary = sqlx::query_as::<_, ProfitSummary>(
            "SELECT \
                COALESCE(SUM(ii.total_cents), 0) AS revenue_cents, \
                COALESCE(SUM(ii.quantity * p.cost_cents), 0) AS cost_cents, \
                COALESCE(SUM(ii.total_cents), 0) - COALESCE(SUM(ii.quantity * p.cost_cents), 0) \
                    AS profit_cents \
             FROM invoice_items ii \
             JOIN products p ON ii.product_id = p.id \
             JOIN invoices i ON ii.invoice_id = i.id \
             WHERE i.date BETWEEN ?1 AND ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Top products by quantity sold over an inclusive date range.
    pub async fn top_products(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: u32,
    ) -> DbResult<Vec<TopProduct>> {
        debug!(%start, %end, limit, "Computing top products");

        let rows = sqlx::query_as::<_, TopProduct>(
            "SELECT \
                p.id AS product_id, \
                p.name, \
                p.barcode, \
                SUM(ii.quantity) AS total_quantity, \
                SUM(ii.total_cents) AS total_cents \
             FROM invoice_items ii \
             JOIN products p ON ii.product_id = p.id \
             JOIN invoices i ON ii.invoice_id = i.id \
             WHERE i.date BETWEEN ?1 AND ?2 \
             GROUP BY p.id \
             ORDER BY total_quantity DESC \
             LIMIT ?3",
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use uuid::Uuid;
    use vend_core::{Cart, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, price: i64, cost: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            // NULL barcodes don't collide with the UNIQUE constraint
            barcode: None,
            name: name.to_string(),
            price_cents: price,
            cost_cents: cost,
            quantity: 100,
            unit: "pcs".to_string(),
            group_name: None,
            subgroup: None,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    async fn sell(db: &Database, product: &Product, qty: i64, paid: bool) {
        let mut cart = Cart::new();
        cart.add_product(product).unwrap();
        if qty > 1 {
            cart.set_quantity(0, qty).unwrap();
        }
        db.invoices().create(cart.lines(), paid, None, None).await.unwrap();
    }

    fn range() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc::now() - Duration::days(1),
            Utc::now() + Duration::minutes(1),
        )
    }

    #[tokio::test]
    async fn test_sales_summary_matches_invoice_totals() {
        let db = test_db().await;
        let tea = seed_product(&db, "Tea", 1000, 600).await;
        let coffee = seed_product(&db, "Coffee", 500, 200).await;

        sell(&db, &tea, 2, true).await; // 20.00 paid
        sell(&db, &coffee, 1, false).await; // 5.00 unpaid

        let (start, end) = range();
        let summary = db.analytics().sales_summary(start, end).await.unwrap();

        assert_eq!(summary.invoice_count, 2);
        assert_eq!(summary.total_cents, 2500);
        assert_eq!(summary.average_cents, 1250);
        assert_eq!(summary.paid_cents, 2000);
        assert_eq!(summary.unpaid_cents, 500);
    }

    #[tokio::test]
    async fn test_sales_summary_empty_range() {
        let db = test_db().await;
        let tea = seed_product(&db, "Tea", 1000, 600).await;
        sell(&db, &tea, 1, true).await;

        let start = Utc::now() - Duration::days(60);
        let end = Utc::now() - Duration::days(30);
        let summary = db.analytics().sales_summary(start, end).await.unwrap();

        assert!(summary.is_empty());
        assert_eq!(summary.total_cents, 0);
        assert_eq!(summary.paid_cents, 0);
    }

    #[tokio::test]
    async fn test_profit_summary() {
        let db = test_db().await;
        let tea = seed_product(&db, "Tea", 1000, 600).await;

        sell(&db, &tea, 3, true).await; // revenue 30.00, cost 18.00

        let (start, end) = range();
        let profit = db.analytics().profit_summary(start, end).await.unwrap();

        assert_eq!(profit.revenue_cents, 3000);
        assert_eq!(profit.cost_cents, 1800);
        assert_eq!(profit.profit_cents, 1200);
        let margin = profit.margin_percent().unwrap();
        assert!((margin - 40.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_profit_margin_on_no_sales() {
        let db = test_db().await;
        let (start, end) = range();
        let profit = db.analytics().profit_summary(start, end).await.unwrap();

        assert_eq!(profit.revenue_cents, 0);
        assert!(profit.margin_percent().is_none());
    }

    #[tokio::test]
    async fn test_top_products_ranked_by_quantity() {
        let db = test_db().await;
        let tea = seed_product(&db, "Tea", 1000, 600).await;
        let coffee = seed_product(&db, "Coffee", 500, 200).await;
        let juice = seed_product(&db, "Juice", 700, 300).await;

        sell(&db, &tea, 5, true).await;
        sell(&db, &coffee, 2, true).await;
        sell(&db, &juice, 8, true).await;

        let (start, end) = range();
        let top = db.analytics().top_products(start, end, 2).await.unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Juice");
        assert_eq!(top[0].total_quantity, 8);
        assert_eq!(top[1].name, "Tea");
        assert_eq!(top[1].total_cents, 5000);
    }
}
