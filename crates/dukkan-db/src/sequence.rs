//! # Invoice Sequencer
//!
//! Issues unique, per-day sequential invoice identifiers.
//!
//! ## Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Sequence Allocation                             │
//! │                                                                     │
//! │  invoice_counters                                                   │
//! │  ┌───────────┬──────────┐                                           │
//! │  │ day       │ next_seq │     next("20240115")                      │
//! │  ├───────────┼──────────┤          │                                │
//! │  │ 20240114  │       42 │          ▼                                │
//! │  │ 20240115  │        6 │ ──► INSERT .. ON CONFLICT(day)            │
//! │  └───────────┴──────────┘     DO UPDATE SET next_seq = next_seq + 1 │
//! │                               RETURNING next_seq   ──►  7           │
//! │                                                                     │
//! │  One statement = one atomic draw. Two concurrent callers can        │
//! │  never receive the same number; a new day starts back at 001.      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The counter is the single source of truth. Deriving the next number by
//! counting existing sale rows would race between the count and the
//! insert, handing two terminals the same invoice id.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use dukkan_core::InvoiceId;

/// Issues invoice ids backed by the `invoice_counters` table.
#[derive(Debug, Clone)]
pub struct InvoiceSequencer {
    pool: SqlitePool,
}

impl InvoiceSequencer {
    /// Creates a new InvoiceSequencer.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceSequencer { pool }
    }

    /// Draws the next invoice id for the given calendar day.
    ///
    /// Atomic with respect to all other callers on the same database:
    /// the upsert-returning statement is a single write. Sequences start
    /// at 001 and are strictly increasing per day.
    pub async fn next(&self, day: NaiveDate) -> DbResult<InvoiceId> {
        let day_key = day.format("%Y%m%d").to_string();

        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_counters (day, next_seq)
            VALUES (?1, 1)
            ON CONFLICT(day) DO UPDATE SET next_seq = next_seq + 1
            RETURNING next_seq
            "#,
        )
        .bind(&day_key)
        .fetch_one(&self.pool)
        .await?;

        let id = InvoiceId::new(day, seq as u32);
        debug!(invoice_id = %id, "Drew invoice sequence");
        Ok(id)
    }

    /// Returns how many ids have been issued for the given day (0 if the
    /// day has no counter row yet). Diagnostics only.
    pub async fn issued_today(&self, day: NaiveDate) -> DbResult<i64> {
        let day_key = day.format("%Y%m%d").to_string();

        let issued: Option<i64> =
            sqlx::query_scalar("SELECT next_seq FROM invoice_counters WHERE day = ?1")
                .bind(&day_key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(issued.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn sequences_start_at_one_and_increase() {
        let seq = db().await.invoice_sequencer();
        let today = day(2024, 1, 15);

        let first = seq.next(today).await.unwrap();
        let second = seq.next(today).await.unwrap();
        let third = seq.next(today).await.unwrap();

        assert_eq!(first.as_str(), "INV-20240115-001");
        assert_eq!(second.as_str(), "INV-20240115-002");
        assert_eq!(third.as_str(), "INV-20240115-003");
        assert_eq!(seq.issued_today(today).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn counter_resets_per_day() {
        let seq = db().await.invoice_sequencer();

        let monday = seq.next(day(2024, 1, 15)).await.unwrap();
        let monday_again = seq.next(day(2024, 1, 15)).await.unwrap();
        let tuesday = seq.next(day(2024, 1, 16)).await.unwrap();

        assert_eq!(monday.seq(), 1);
        assert_eq!(monday_again.seq(), 2);
        assert_eq!(tuesday.seq(), 1);
        assert_eq!(tuesday.as_str(), "INV-20240116-001");
    }

    #[tokio::test]
    async fn concurrent_draws_never_collide() {
        let database = db().await;
        let today = day(2024, 1, 15);

        let mut handles = Vec::new();
        for _ in 0..10 {
            let seq = database.invoice_sequencer();
            handles.push(tokio::spawn(async move { seq.next(today).await }));
        }

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            let id = handle.await.unwrap().unwrap();
            assert!(seen.insert(id.seq()), "duplicate sequence issued");
        }

        assert_eq!(seen.len(), 10);
        assert_eq!(*seen.iter().max().unwrap(), 10);
    }
}
