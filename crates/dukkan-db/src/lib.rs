//! # dukkan-db: Database Layer for Dukkan POS
//!
//! SQLite persistence for the store: pool management, embedded
//! migrations, repositories, and the invoice sequencer.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Dukkan Data Flow                               │
//! │                                                                     │
//! │  dukkan-engine (checkout, access control)                           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌────────────────────────────────────────────────────────────────┐ │
//! │  │                   dukkan-db (THIS CRATE)                       │ │
//! │  │                                                                │ │
//! │  │  ┌────────────┐  ┌───────────────┐  ┌───────────────────────┐ │ │
//! │  │  │  Database  │  │ Repositories  │  │ Migrations (embedded) │ │ │
//! │  │  │ (pool.rs)  │◄─│ product, sale │  │ 001_initial_schema    │ │ │
//! │  │  │            │  │ employee, ... │  │ 002_invoice_counters  │ │ │
//! │  │  └────────────┘  └───────────────┘  └───────────────────────┘ │ │
//! │  │        ┌───────────────────┐                                  │ │
//! │  │        │ InvoiceSequencer  │  per-day atomic counter          │ │
//! │  │        └───────────────────┘                                  │ │
//! │  └────────────────────────────┬───────────────────────────────────┘ │
//! │                               ▼                                     │
//! │                    SQLite file (WAL mode)                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dukkan_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("store.db")).await?;
//! let milk = db.products().get("Milk").await?;
//! let invoice = db.invoice_sequencer().next(today).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sequence;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use sequence::InvoiceSequencer;

// Repository re-exports for convenience
pub use repository::employee::EmployeeRepository;
pub use repository::product::{ProductFilter, ProductRepository};
pub use repository::report::{
    BestSeller, DailySaleRow, DailyTotal, ExpiryAlert, InvoiceSummary, ReportRepository,
};
pub use repository::sale::SaleRepository;
pub use repository::settings::SettingsRepository;
