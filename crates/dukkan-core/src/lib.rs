//! # dukkan-core: Pure Business Logic for Dukkan POS
//!
//! The **heart** of the system: domain types and rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Dukkan Architecture                            │
//! │                                                                     │
//! │  Terminals (cashier / warehouse / manager screens — out of scope)   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼──────────────────────────────────┐ │
//! │  │                    dukkan-engine                               │ │
//! │  │    checkout (finalize), access control, sessions               │ │
//! │  └─────────────────────────────┬──────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼──────────────────────────────────┐ │
//! │  │               ★ dukkan-core (THIS CRATE) ★                     │ │
//! │  │                                                                │ │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐  │ │
//! │  │   │  types  │ │  money  │ │  cart   │ │ invoice │ │validate│  │ │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └────────┘  │ │
//! │  │                                                                │ │
//! │  │   NO I/O • NO DATABASE • NO ASYNC • PURE FUNCTIONS             │ │
//! │  └─────────────────────────────┬──────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼──────────────────────────────────┐ │
//! │  │                    dukkan-db (SQLite layer)                    │ │
//! │  └────────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, SaleLine, Employee, ...)
//! - [`money`] - Integer money and discount rates (no floating point!)
//! - [`invoice`] - The `INV-YYYYMMDD-NNN` invoice id newtype
//! - [`cart`] - The caller-local pending sale
//! - [`validation`] - Boundary validation rules
//! - [`error`] - Domain error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::InvoiceId;
pub use money::{DiscountRate, Money};
pub use types::{Employee, NewProduct, Product, Role, SaleLine, StoreSettings};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level at or below which a product counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Days ahead (inclusive) within which an expiry date raises an alert.
pub const EXPIRY_ALERT_DAYS: i64 = 15;

/// Maximum distinct lines in a single cart.
///
/// Prevents runaway carts and keeps a finalize to a bounded number of
/// per-line transactions.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity on a single cart line.
///
/// Guards against fat-finger entries (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
