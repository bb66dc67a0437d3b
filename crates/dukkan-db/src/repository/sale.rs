//! # Sale Repository
//!
//! The append-only sale ledger.
//!
//! ## The Per-Line Atomic Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      record_line(...)                               │
//! │                                                                     │
//! │  BEGIN                                                              │
//! │    UPDATE products SET quantity = quantity - ?  (stock guard)       │
//! │    INSERT INTO sales (...)                      (ledger append)     │
//! │  COMMIT                                                             │
//! │                                                                     │
//! │  The decrement and the appended line commit together or not at      │
//! │  all: a sale line can never exist without its stock having been     │
//! │  taken, and stock is never taken without a line recording it.       │
//! │  The cart as a whole is NOT one transaction; each line is.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sale rows are never updated or deleted. Reads group them by
//! `invoice_id` to materialize invoices.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::product::try_decrement_in;
use dukkan_core::{InvoiceId, Money, SaleLine};

/// Repository for the sale ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records one sale line: decrements stock and appends the ledger row
    /// in a single transaction.
    ///
    /// ## Arguments
    /// * `invoice_id` - the invoice this line belongs to
    /// * `product_name` - product identity key at time of sale
    /// * `effective_price` - unit price actually charged (post-discount)
    /// * `quantity` - units sold (> 0)
    /// * `sale_time` - timestamp to record
    ///
    /// ## Returns
    /// * `Ok((line_id, remaining_stock))`
    /// * `Err(DbError::NotFound)` / `Err(DbError::InsufficientStock)` -
    ///   nothing was written
    pub async fn record_line(
        &self,
        invoice_id: &InvoiceId,
        product_name: &str,
        effective_price: Money,
        quantity: i64,
        sale_time: DateTime<Utc>,
    ) -> DbResult<(i64, i64)> {
        let mut tx = self.pool.begin().await?;

        let remaining = try_decrement_in(&mut tx, product_name, quantity).await?;

        let line_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (invoice_id, product_name, sell_price, quantity, sale_time)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(invoice_id)
        .bind(product_name)
        .bind(effective_price)
        .bind(quantity)
        .bind(sale_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            invoice_id = %invoice_id,
            product = %product_name,
            quantity,
            remaining,
            "Sale line recorded"
        );

        Ok((line_id, remaining))
    }

    /// Gets all lines of an invoice, in recorded order. Consumed by
    /// receipt printing and spreadsheet export collaborators.
    pub async fn lines_for_invoice(&self, invoice_id: &InvoiceId) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, invoice_id, product_name, sell_price, quantity, sale_time
            FROM sales
            WHERE invoice_id = ?1
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Counts ledger rows (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
