//! # Engine Error Types
//!
//! What terminals see: checkout and authentication outcomes, wrapping the
//! lower layers' errors.

use thiserror::Error;

use dukkan_core::{CoreError, InvoiceId, ValidationError};
use dukkan_db::DbError;

/// Errors surfaced by the checkout engine and access control.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Finalize was invoked on an empty cart. No side effects.
    #[error("Cart is empty")]
    EmptyCart,

    /// A product name did not resolve against the inventory store.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Login failed. Deliberately silent about whether the name or the
    /// password was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A finalize stopped partway: the named line failed, every earlier
    /// line is already committed under `invoice_id`.
    ///
    /// Callers must treat this as "partially applied" and reconcile by
    /// reading the invoice's lines, not assume a rollback happened.
    #[error(
        "Sale {invoice_id} failed at line {line_index} ({product}): {source}; \
         {lines_committed} line(s) already committed"
    )]
    SaleFailed {
        invoice_id: InvoiceId,
        /// Zero-based index of the failing cart line.
        line_index: usize,
        /// Product on the failing line.
        product: String,
        /// How many earlier lines were durably recorded.
        lines_committed: usize,
        #[source]
        source: DbError,
    },

    /// Domain-rule violation from the core layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
