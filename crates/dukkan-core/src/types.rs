//! # Domain Types
//!
//! Typed records for the persisted entities.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │    Product     │   │    SaleLine    │   │    Employee    │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  name (unique, │   │  invoice_id    │   │  name (unique) │      │
//! │  │   barcode)     │   │  product_name  │   │  role          │      │
//! │  │  cost_price    │   │  sell_price    │   │  password_hash │      │
//! │  │  sell_price    │   │   (effective)  │   │  can_apply_    │      │
//! │  │  quantity ≥ 0  │   │  quantity > 0  │   │   discount     │      │
//! │  │  expiry_date?  │   │  sale_time     │   └────────────────┘      │
//! │  └────────────────┘   └────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product's `name` is its business identity key and doubles as the
//! barcode payload. Sale lines reference products by name *at the time of
//! sale*; renaming a product does not relink history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation;

// =============================================================================
// Product
// =============================================================================

/// A product on the shelf, with its current stock level.
///
/// Invariants: `name` unique across live products, `quantity` never
/// negative. The quantity is only mutated through the inventory store's
/// guarded decrement and the management update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Database row id.
    pub id: i64,

    /// Unique display name; also the barcode payload.
    pub name: String,

    /// Purchase cost per unit (current, not historical).
    pub cost_price: Money,

    /// Shelf price per unit before any discount.
    pub sell_price: Money,

    /// Current stock level.
    pub quantity: i64,

    /// Optional expiry date for perishables.
    pub expiry_date: Option<NaiveDate>,

    /// Optional supplier name.
    pub supplier: Option<String>,
}

impl Product {
    /// Checks whether stock is at or below the low-stock threshold.
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity <= threshold
    }

    /// Checks whether the shelf is empty.
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }

    /// Checks whether the product expires within `days` days of `today`
    /// (inclusive on both ends). Products without an expiry never match.
    pub fn expires_within(&self, today: NaiveDate, days: i64) -> bool {
        match self.expiry_date {
            Some(expiry) => {
                let remaining = (expiry - today).num_days();
                (0..=days).contains(&remaining)
            }
            None => false,
        }
    }
}

// =============================================================================
// New Product (validating constructor)
// =============================================================================

/// A product awaiting insertion, validated at construction.
///
/// Fields are private: the only way to obtain a `NewProduct` is through
/// [`NewProduct::new`], which enforces the record invariants (non-empty
/// name, positive prices, non-negative stock) before anything reaches the
/// database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    name: String,
    cost_price: Money,
    sell_price: Money,
    quantity: i64,
    expiry_date: Option<NaiveDate>,
    supplier: Option<String>,
}

impl NewProduct {
    /// Validates and builds a product record.
    ///
    /// ## Rules
    /// - `name` non-empty, at most 200 characters
    /// - `cost_price` and `sell_price` strictly positive
    /// - `quantity` non-negative
    ///
    /// Selling below cost is allowed (clearance pricing) and left to the
    /// caller to warn about.
    pub fn new(
        name: &str,
        cost_price: Money,
        sell_price: Money,
        quantity: i64,
        expiry_date: Option<NaiveDate>,
        supplier: Option<String>,
    ) -> Result<Self, ValidationError> {
        validation::validate_product_name(name)?;
        validation::validate_price(cost_price, "cost_price")?;
        validation::validate_price(sell_price, "sell_price")?;
        validation::validate_stock_quantity(quantity)?;

        Ok(NewProduct {
            name: name.trim().to_string(),
            cost_price,
            sell_price,
            quantity,
            expiry_date,
            supplier: supplier.filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost_price(&self) -> Money {
        self.cost_price
    }

    pub fn sell_price(&self) -> Money {
        self.sell_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.expiry_date
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// One durable, append-only record of a quantity of a product sold at an
/// effective price and time. Never mutated or deleted once written.
///
/// An *invoice* is not a stored entity; it is the set of sale lines
/// sharing one `invoice_id`, materialized on read by grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    /// Database row id.
    pub id: i64,

    /// Invoice this line belongs to.
    pub invoice_id: crate::invoice::InvoiceId,

    /// Product name at time of sale (by value, not a durable FK).
    pub product_name: String,

    /// Effective unit price actually charged, after any discount.
    /// Historical and immutable once written.
    pub sell_price: Money,

    /// Quantity sold (always > 0).
    pub quantity: i64,

    /// When the line was recorded.
    pub sale_time: DateTime<Utc>,
}

impl SaleLine {
    /// Line total = effective unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.sell_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Employee & Role
// =============================================================================

/// Terminal roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, may always apply discounts.
    Manager,
    /// Point-of-sale terminal operator.
    Seller,
    /// Stock management terminal operator.
    Warehouse,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Seller => "seller",
            Role::Warehouse => "warehouse",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Role::Manager),
            "seller" => Ok(Role::Seller),
            "warehouse" => Ok(Role::Warehouse),
            other => Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

/// An employee account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    /// Database row id.
    pub id: i64,

    /// Unique login name.
    pub name: String,

    /// Terminal role.
    pub role: Role,

    /// argon2 PHC hash of the password. Never the plaintext.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Stored discount permission flag.
    pub can_apply_discount: bool,
}

impl Employee {
    /// Whether this employee may apply a discount at checkout.
    ///
    /// Managers may regardless of the stored flag; the flag is
    /// additionally forced true for manager rows at the data-write
    /// boundary.
    pub fn can_discount(&self) -> bool {
        self.role == Role::Manager || self.can_apply_discount
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Singleton terminal settings record. Not consulted for permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoreSettings {
    /// Last logged-in user name.
    pub user_name: Option<String>,

    /// Role of the last login.
    pub last_login_role: Option<Role>,

    /// Selected theme name.
    pub theme: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
