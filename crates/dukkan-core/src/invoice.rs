//! # Invoice Identifiers
//!
//! The `INV-YYYYMMDD-NNN` invoice id newtype.
//!
//! ## Format
//! ```text
//! INV-20240115-007
//! │   │        └── per-day sequence, zero-padded to 3 digits
//! │   └─────────── calendar day the invoice was opened (server local day)
//! └─────────────── fixed prefix
//! ```
//!
//! Sequences start at 001 each day and are strictly increasing for all
//! invoices opened the same day. The sequence widens naturally past 999
//! (`INV-20240115-1000`); same-day ids remain unique either way.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

const PREFIX: &str = "INV";

/// A unique, per-day sequential invoice identifier.
///
/// Stored as TEXT; `sqlx(transparent)` keeps the column a plain string
/// while the Rust side stays typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct InvoiceId(String);

impl InvoiceId {
    /// Builds an invoice id from a day and a per-day sequence number.
    pub fn new(day: NaiveDate, seq: u32) -> Self {
        InvoiceId(format!("{}-{}-{:03}", PREFIX, day.format("%Y%m%d"), seq))
    }

    /// Parses an id back into its parts, rejecting malformed input.
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::invoice::InvoiceId;
    ///
    /// let id = InvoiceId::parse("INV-20240115-007").unwrap();
    /// assert_eq!(id.seq(), 7);
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "invoice_id".to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.splitn(3, '-');
        let (prefix, day, seq) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(d), Some(q)) => (p, d, q),
            _ => return Err(invalid("expected INV-YYYYMMDD-NNN")),
        };

        if prefix != PREFIX {
            return Err(invalid("expected INV prefix"));
        }
        NaiveDate::parse_from_str(day, "%Y%m%d").map_err(|_| invalid("bad date portion"))?;
        if seq.len() < 3 || seq.parse::<u32>().is_err() {
            return Err(invalid("bad sequence portion"));
        }

        Ok(InvoiceId(s.to_string()))
    }

    /// The calendar day encoded in the id.
    ///
    /// Ids built by [`InvoiceId::new`] or [`InvoiceId::parse`] always
    /// carry a valid date portion; a malformed id read from elsewhere
    /// yields the epoch date rather than a panic.
    pub fn day(&self) -> NaiveDate {
        self.0
            .get(4..12)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y%m%d").ok())
            .unwrap_or_default()
    }

    /// The per-day sequence number (0 for a malformed id).
    pub fn seq(&self) -> u32 {
        self.0
            .get(13..)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<InvoiceId> for String {
    fn from(id: InvoiceId) -> String {
        id.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
