//! # Cart
//!
//! The caller-local, non-durable collection of pending sale lines.
//!
//! ## Invariants
//! - Lines are unique by product name (adding the same product again
//!   increases its quantity)
//! - Line quantity is always > 0 (setting it to 0 removes the line)
//! - At most [`MAX_CART_LINES`](crate::MAX_CART_LINES) distinct lines,
//!   [`MAX_LINE_QUANTITY`](crate::MAX_LINE_QUANTITY) units per line
//!
//! The unit price is frozen when the line is added: if the shelf price
//! changes before finalize, the cart keeps the price the operator quoted.
//! Stock is NOT reserved by adding to a cart; it is re-checked when the
//! sale is finalized.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{DiscountRate, Money};
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// One pending line: a product name, the unit price frozen at add time,
/// and a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identity key (also the barcode payload).
    pub product_name: String,

    /// Unit price frozen when the line was added (pre-discount).
    pub unit_price: Money,

    /// Units requested.
    pub quantity: i64,
}

impl CartLine {
    /// Line total before any discount.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The pending sale. Caller-local: abandoning a cart has no durable
/// effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart or increases the quantity of its
    /// existing line.
    ///
    /// ## Errors
    /// - `QuantityTooLarge` if the line would exceed the per-line cap
    /// - `CartTooLarge` if a new line would exceed the line-count cap
    /// - `Validation` if `quantity` is not positive
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        crate::validation::validate_sale_quantity(quantity)?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_name == product.name)
        {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.lines.push(CartLine {
            product_name: product.name.clone(),
            unit_price: product.sell_price,
            quantity,
        });
        Ok(())
    }

    /// Sets the quantity of an existing line; 0 removes the line.
    pub fn set_quantity(&mut self, product_name: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(product_name);
        }
        if quantity < 0 {
            return Err(crate::error::ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        match self
            .lines
            .iter_mut()
            .find(|l| l.product_name == product_name)
        {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::NotInCart(product_name.to_string())),
        }
    }

    /// Removes a line by product name.
    pub fn remove(&mut self, product_name: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_name != product_name);
        if self.lines.len() == before {
            return Err(CoreError::NotInCart(product_name.to_string()));
        }
        Ok(())
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The pending lines, in the order they were added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Subtotal before any discount.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Preview of the total after a discount, computed the same way
    /// finalize records it: the discount is applied to the unit price,
    /// then multiplied by quantity, so the preview matches the recorded
    /// lines cent for cent.
    pub fn discounted_total(&self, rate: DiscountRate) -> Money {
        self.lines
            .iter()
            .map(|l| l.unit_price.apply_discount(rate).multiply_quantity(l.quantity))
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
