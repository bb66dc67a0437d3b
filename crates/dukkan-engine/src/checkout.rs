//! # Checkout Engine
//!
//! Drives a cart through validation, stock decrement, and durable sale
//! recording.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Cart Lifecycle                                │
//! │                                                                     │
//! │   Empty ──add_item──► Building ──finalize──► Finalizing             │
//! │     ▲                  │    ▲                    │                  │
//! │     └──────cancel──────┘    │              ┌─────┴─────┐            │
//! │                             │              ▼           ▼            │
//! │                             │          Committed    Failed          │
//! │                             │          (invoice     (prefix of      │
//! │                             │           returned,    lines already  │
//! │                             └──────────  caller      committed,     │
//! │                                          clears      cart kept for  │
//! │                                          cart)       correction)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Finalize
//! One invoice id is drawn per finalize. Lines are processed in cart
//! order; each line's stock decrement and ledger append commit in one
//! transaction. On the first `InsufficientStock`/`NotFound` the loop
//! stops: earlier lines STAY COMMITTED (there is no compensating
//! rollback), and [`EngineError::SaleFailed`] reports the invoice id and
//! the committed prefix so the caller can reconcile. The cart keeps the
//! operator's full intended content for correction.
//!
//! Adding to a cart never reserves stock; availability is re-checked by
//! the guard when the sale is finalized.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::session::Session;
use dukkan_core::{validation, Cart, DiscountRate, InvoiceId, Money};
use dukkan_db::{Database, DbError};

// =============================================================================
// Response Types
// =============================================================================

/// Outcome of adding a product to a cart.
#[derive(Debug, Clone, Serialize)]
pub struct AddedLine {
    /// Product identity key.
    pub product_name: String,

    /// Unit price frozen into the cart line.
    pub unit_price: Money,

    /// Quantity now pending on this line.
    pub quantity_in_cart: i64,

    /// Shelf quantity at lookup time (display only, nothing reserved).
    pub stock_on_hand: i64,

    /// Warning flag: the shelf is empty. Adding is still allowed; the
    /// sale will be refused at finalize if stock hasn't arrived by then.
    pub out_of_stock: bool,
}

/// One recorded line on a committed invoice.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptLine {
    pub product_name: String,

    /// Effective unit price charged (post-discount).
    pub unit_price: Money,

    pub quantity: i64,

    /// `unit_price × quantity`.
    pub line_total: Money,
}

/// A committed sale, returned to the caller for printing/export.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub invoice_id: InvoiceId,
    pub lines: Vec<ReceiptLine>,

    /// Sum of pre-discount line totals.
    pub subtotal: Money,

    /// The discount actually applied (zero if the session lacked the
    /// permission).
    pub discount: DiscountRate,

    /// Sum of recorded line totals; what the customer pays.
    pub total: Money,

    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Engine
// =============================================================================

/// The sales transaction engine.
///
/// The sole writer of sale rows and the sole caller of the stock
/// decrement in the sales path; all stock-mutating logic funnels through
/// [`CheckoutEngine::finalize`].
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    db: Database,
}

impl CheckoutEngine {
    /// Creates a new CheckoutEngine.
    pub fn new(db: Database) -> Self {
        CheckoutEngine { db }
    }

    /// Adds a product to the cart (or increments its line), freezing the
    /// current shelf price into the line.
    ///
    /// ## Errors
    /// * `ProductNotFound` - unknown product name
    /// * cart cap violations from the core layer
    ///
    /// Zero stock is a *warning* on the returned [`AddedLine`], not an
    /// error: the authoritative check happens at finalize.
    pub async fn add_item(
        &self,
        cart: &mut Cart,
        product_name: &str,
        quantity: i64,
    ) -> EngineResult<AddedLine> {
        let product = self
            .db
            .products()
            .get(product_name)
            .await?
            .ok_or_else(|| EngineError::ProductNotFound(product_name.to_string()))?;

        cart.add(&product, quantity)?;

        if product.is_out_of_stock() {
            warn!(product = %product.name, "Added out-of-stock product to cart");
        }

        let quantity_in_cart = cart
            .lines()
            .iter()
            .find(|l| l.product_name == product.name)
            .map(|l| l.quantity)
            .unwrap_or(quantity);

        Ok(AddedLine {
            product_name: product.name.clone(),
            unit_price: product.sell_price,
            quantity_in_cart,
            stock_on_hand: product.quantity,
            out_of_stock: product.is_out_of_stock(),
        })
    }

    /// Clears the cart. No durable effect; an abandoned cart leaves no
    /// trace.
    pub fn cancel(&self, cart: &mut Cart) {
        debug!(lines = cart.len(), "Cart cancelled");
        cart.clear();
    }

    /// Finalizes the cart into a durable invoice.
    ///
    /// ## Arguments
    /// * `session` - the acting employee's session; gates the discount
    /// * `cart` - the pending lines (left untouched here; the caller
    ///   clears it after a committed sale)
    /// * `requested_discount` - honored only if the session may discount,
    ///   silently zero otherwise
    ///
    /// ## Returns
    /// * `Ok(Receipt)` - every line committed
    /// * `Err(EmptyCart)` - nothing to sell, no side effects
    /// * `Err(SaleFailed)` - a line was refused; see the module docs for
    ///   the partial-commit contract
    pub async fn finalize(
        &self,
        session: &Session,
        cart: &Cart,
        requested_discount: DiscountRate,
    ) -> EngineResult<Receipt> {
        if cart.is_empty() {
            return Err(EngineError::EmptyCart);
        }
        validation::validate_discount_bps(requested_discount.bps())?;

        let discount = session.allowed_discount(requested_discount);
        if discount != requested_discount {
            warn!(
                employee = %session.employee_name,
                requested_bps = requested_discount.bps(),
                "Discount request refused; employee lacks the permission"
            );
        }

        // One sequencer draw per finalize; every line shares it. The
        // invoice day is the server's local calendar day.
        let invoice_id = self
            .db
            .invoice_sequencer()
            .next(Local::now().date_naive())
            .await?;

        debug!(
            invoice_id = %invoice_id,
            lines = cart.len(),
            discount_bps = discount.bps(),
            "Finalizing sale"
        );

        let sales = self.db.sales();
        let mut lines = Vec::with_capacity(cart.len());

        for (line_index, line) in cart.lines().iter().enumerate() {
            let effective_price = line.unit_price.apply_discount(discount);
            let sale_time = Utc::now();

            match sales
                .record_line(
                    &invoice_id,
                    &line.product_name,
                    effective_price,
                    line.quantity,
                    sale_time,
                )
                .await
            {
                Ok(_) => {
                    lines.push(ReceiptLine {
                        product_name: line.product_name.clone(),
                        unit_price: effective_price,
                        quantity: line.quantity,
                        line_total: effective_price.multiply_quantity(line.quantity),
                    });
                }
                Err(source @ (DbError::InsufficientStock { .. } | DbError::NotFound { .. })) => {
                    warn!(
                        invoice_id = %invoice_id,
                        line_index,
                        product = %line.product_name,
                        lines_committed = lines.len(),
                        "Sale stopped mid-cart; committed lines stand"
                    );
                    return Err(EngineError::SaleFailed {
                        invoice_id,
                        line_index,
                        product: line.product_name.clone(),
                        lines_committed: lines.len(),
                        source,
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }

        let total: Money = lines.iter().map(|l| l.line_total).sum();
        let receipt = Receipt {
            invoice_id,
            subtotal: cart.subtotal(),
            discount,
            total,
            lines,
            completed_at: Utc::now(),
        };

        info!(
            invoice_id = %receipt.invoice_id,
            employee = %session.employee_name,
            lines = receipt.lines.len(),
            total = %receipt.total,
            "Sale committed"
        );

        Ok(receipt)
    }
}
