//! # Report Repository
//!
//! The reporting aggregator: read-only queries over the sale ledger and
//! product table. No method here has side effects.
//!
//! ## Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  daily_sales(day)      lines of one day + CURRENT cost price        │
//! │  all_invoices()        ledger grouped by invoice id                 │
//! │  sales_last_7_days()   per-day totals, window ending today          │
//! │  best_sellers(limit)   by total quantity sold                       │
//! │  expiry_alerts(today)  expiry within the next 15 days               │
//! │  low_stock(threshold)  shelf quantity at or below threshold         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Profit figures join the *current* product cost, not a cost snapshot
//! taken at sale time; a product renamed or deleted since its sale drops
//! out of `daily_sales` (the join misses). Both are intentional, known
//! limitations of the reporting model.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;
use dukkan_core::{InvoiceId, Money, Product, EXPIRY_ALERT_DAYS};

// =============================================================================
// Row Types
// =============================================================================

/// One sale line of a day, joined with the current product cost.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailySaleRow {
    pub invoice_id: InvoiceId,
    pub product_name: String,
    /// Effective unit price charged (historical).
    pub sell_price: Money,
    pub quantity: i64,
    /// Cost price as of the query, NOT as of the sale.
    pub cost_price: Money,
}

impl DailySaleRow {
    /// Revenue of this line.
    pub fn line_total(&self) -> Money {
        self.sell_price.multiply_quantity(self.quantity)
    }

    /// Profit of this line against the current cost.
    pub fn line_profit(&self) -> Money {
        (self.sell_price - self.cost_price).multiply_quantity(self.quantity)
    }
}

/// An invoice materialized from its lines.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InvoiceSummary {
    pub invoice_id: InvoiceId,
    /// Earliest sale time among the invoice's lines.
    pub opened_at: DateTime<Utc>,
    /// Σ(sell_price × quantity) over the invoice's lines.
    pub total: Money,
}

/// Total sales of one calendar day.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub total: Money,
}

/// A best-selling product with its all-time quantity sold.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BestSeller {
    pub product_name: String,
    pub total_quantity: i64,
}

/// A product approaching its expiry date.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ExpiryAlert {
    pub product_name: String,
    pub expiry_date: NaiveDate,
}

// =============================================================================
// Repository
// =============================================================================

/// Read-only reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sale lines of one calendar day, joined with the current product
    /// cost price for profit reporting.
    pub async fn daily_sales(&self, day: NaiveDate) -> DbResult<Vec<DailySaleRow>> {
        let rows = sqlx::query_as::<_, DailySaleRow>(
            r#"
            SELECT
                s.invoice_id,
                s.product_name,
                s.sell_price,
                s.quantity,
                p.cost_price
            FROM sales s
            JOIN products p ON s.product_name = p.name
            WHERE date(s.sale_time) = ?1
            ORDER BY s.id
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All invoices, newest first, each with its earliest sale time and
    /// line-total sum.
    pub async fn all_invoices(&self) -> DbResult<Vec<InvoiceSummary>> {
        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT
                invoice_id,
                MIN(sale_time) AS opened_at,
                SUM(sell_price * quantity) AS total
            FROM sales
            GROUP BY invoice_id
            ORDER BY MIN(sale_time) DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Per-day totals for the 7-day window ending `today` inclusive,
    /// ascending by day. Days with no sales are absent, not zero-filled;
    /// callers needing a dense series fill the gaps themselves.
    pub async fn sales_last_7_days(&self, today: NaiveDate) -> DbResult<Vec<DailyTotal>> {
        let window_start = today - Duration::days(6);

        let totals = sqlx::query_as::<_, DailyTotal>(
            r#"
            SELECT
                date(sale_time) AS day,
                SUM(sell_price * quantity) AS total
            FROM sales
            WHERE date(sale_time) BETWEEN ?1 AND ?2
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(window_start)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Best-selling products by total quantity sold, descending. Ties
    /// break on product name ascending, so the ordering is deterministic.
    pub async fn best_sellers(&self, limit: u32) -> DbResult<Vec<BestSeller>> {
        let sellers = sqlx::query_as::<_, BestSeller>(
            r#"
            SELECT
                product_name,
                SUM(quantity) AS total_quantity
            FROM sales
            GROUP BY product_name
            ORDER BY total_quantity DESC, product_name ASC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sellers)
    }

    /// Products whose expiry date falls within `[today, today + 15 days]`
    /// inclusive. Products without an expiry date are excluded. Invoked
    /// after every product-list refresh to drive the user-facing warning.
    pub async fn expiry_alerts(&self, today: NaiveDate) -> DbResult<Vec<ExpiryAlert>> {
        let horizon = today + Duration::days(EXPIRY_ALERT_DAYS);

        let alerts = sqlx::query_as::<_, ExpiryAlert>(
            r#"
            SELECT name AS product_name, expiry_date
            FROM products
            WHERE expiry_date IS NOT NULL
              AND expiry_date BETWEEN ?1 AND ?2
            ORDER BY expiry_date ASC, name ASC
            "#,
        )
        .bind(today)
        .bind(horizon)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Products with shelf quantity at or below the threshold, emptiest
    /// first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, cost_price, sell_price, quantity, expiry_date, supplier
            FROM products
            WHERE quantity <= ?1
            ORDER BY quantity ASC, name ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use dukkan_core::NewProduct;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_noon(d: NaiveDate) -> DateTime<Utc> {
        d.and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    async fn seed_product(db: &Database, name: &str, cost: i64, sell: i64, qty: i64) {
        let new = NewProduct::new(
            name,
            Money::from_cents(cost),
            Money::from_cents(sell),
            qty,
            None,
            None,
        )
        .unwrap();
        db.products().insert(&new).await.unwrap();
    }

    async fn record(db: &Database, inv: &InvoiceId, name: &str, price: i64, qty: i64, t: DateTime<Utc>) {
        db.sales()
            .record_line(inv, name, Money::from_cents(price), qty, t)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn daily_sales_joins_current_cost() {
        let database = db().await;
        seed_product(&database, "Milk", 600, 1000, 50).await;

        let today = day(2024, 1, 15);
        let inv = InvoiceId::new(today, 1);
        record(&database, &inv, "Milk", 1000, 2, at_noon(today)).await;
        // A sale the day before must not appear.
        let inv0 = InvoiceId::new(day(2024, 1, 14), 1);
        record(&database, &inv0, "Milk", 1000, 1, at_noon(day(2024, 1, 14))).await;

        let rows = database.reports().daily_sales(today).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].cost_price.cents(), 600);
        assert_eq!(rows[0].line_total().cents(), 2000);
        assert_eq!(rows[0].line_profit().cents(), 800);
    }

    #[tokio::test]
    async fn daily_sales_drops_renamed_products() {
        let database = db().await;
        seed_product(&database, "Milk", 600, 1000, 50).await;

        let today = day(2024, 1, 15);
        let inv = InvoiceId::new(today, 1);
        record(&database, &inv, "Milk", 1000, 1, at_noon(today)).await;

        let mut product = database.products().get("Milk").await.unwrap().unwrap();
        product.name = "Whole Milk".to_string();
        database.products().update(&product).await.unwrap();

        // The join by name misses now; the line stays in the ledger.
        assert!(database.reports().daily_sales(today).await.unwrap().is_empty());
        assert_eq!(database.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn all_invoices_groups_and_orders() {
        let database = db().await;
        seed_product(&database, "Milk", 600, 1000, 50).await;
        seed_product(&database, "Bread", 200, 500, 50).await;

        let today = day(2024, 1, 15);
        let inv1 = InvoiceId::new(today, 1);
        let inv2 = InvoiceId::new(today, 2);
        record(&database, &inv1, "Milk", 1000, 2, at_noon(today)).await;
        record(&database, &inv1, "Bread", 500, 1, at_noon(today)).await;
        record(&database, &inv2, "Milk", 1000, 1, at_noon(today) + Duration::hours(1)).await;

        let invoices = database.reports().all_invoices().await.unwrap();
        assert_eq!(invoices.len(), 2);

        // Newest first.
        assert_eq!(invoices[0].invoice_id, inv2);
        assert_eq!(invoices[0].total.cents(), 1000);
        assert_eq!(invoices[1].invoice_id, inv1);
        assert_eq!(invoices[1].total.cents(), 2500);
    }

    #[tokio::test]
    async fn last_7_days_window_without_zero_fill() {
        let database = db().await;
        seed_product(&database, "Milk", 600, 1000, 99).await;

        let today = day(2024, 1, 15);
        let in_window_a = day(2024, 1, 9); // today - 6: first day inside
        let in_window_b = day(2024, 1, 12);
        let outside = day(2024, 1, 8); // today - 7: outside

        for (i, d) in [in_window_a, in_window_b, outside].iter().enumerate() {
            let inv = InvoiceId::new(*d, (i + 1) as u32);
            record(&database, &inv, "Milk", 1000, 1, at_noon(*d)).await;
        }

        let totals = database.reports().sales_last_7_days(today).await.unwrap();

        // Two days with sales inside the window; silent days absent.
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].day, in_window_a);
        assert_eq!(totals[1].day, in_window_b);
        assert_eq!(totals[0].total.cents(), 1000);
    }

    #[tokio::test]
    async fn best_sellers_tie_breaks_by_name() {
        let database = db().await;
        seed_product(&database, "Milk", 600, 1000, 99).await;
        seed_product(&database, "Bread", 200, 500, 99).await;
        seed_product(&database, "Apples", 100, 300, 99).await;

        let today = day(2024, 1, 15);
        let inv = InvoiceId::new(today, 1);
        record(&database, &inv, "Milk", 1000, 5, at_noon(today)).await;
        record(&database, &inv, "Bread", 500, 3, at_noon(today)).await;
        record(&database, &inv, "Apples", 300, 3, at_noon(today)).await;

        let sellers = database.reports().best_sellers(10).await.unwrap();
        assert_eq!(sellers.len(), 3);
        assert_eq!(sellers[0].product_name, "Milk");
        assert_eq!(sellers[0].total_quantity, 5);
        // Bread and Apples tie at 3; name ascending pins Apples first.
        assert_eq!(sellers[1].product_name, "Apples");
        assert_eq!(sellers[2].product_name, "Bread");

        let top_two = database.reports().best_sellers(2).await.unwrap();
        assert_eq!(top_two.len(), 2);
    }

    #[tokio::test]
    async fn expiry_alert_window_is_inclusive() {
        let database = db().await;
        let today = day(2024, 1, 15);

        let mk = |name: &str, expiry: Option<NaiveDate>| {
            NewProduct::new(
                name,
                Money::from_cents(100),
                Money::from_cents(200),
                5,
                expiry,
                None,
            )
            .unwrap()
        };

        let products = database.products();
        products.insert(&mk("Today", Some(today))).await.unwrap();
        products
            .insert(&mk("In15", Some(today + Duration::days(15))))
            .await
            .unwrap();
        products
            .insert(&mk("In16", Some(today + Duration::days(16))))
            .await
            .unwrap();
        products
            .insert(&mk("Expired", Some(today - Duration::days(1))))
            .await
            .unwrap();
        products.insert(&mk("NoExpiry", None)).await.unwrap();

        let alerts = database.reports().expiry_alerts(today).await.unwrap();
        let names: Vec<_> = alerts.iter().map(|a| a.product_name.as_str()).collect();

        // Exactly 15 days out is included; 16 days out is not. Already
        // expired and expiry-free products are excluded.
        assert_eq!(names, vec!["Today", "In15"]);
    }

    #[tokio::test]
    async fn low_stock_threshold_is_inclusive() {
        let database = db().await;
        seed_product(&database, "Milk", 600, 1000, 0).await;
        seed_product(&database, "Bread", 200, 500, 5).await;
        seed_product(&database, "Apples", 100, 300, 6).await;

        let low = database.reports().low_stock(5).await.unwrap();
        let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Bread"]);
    }
}
