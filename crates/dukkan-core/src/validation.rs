//! # Validation Module
//!
//! Input validation at the boundary, before business logic runs.
//!
//! Three layers catch malformed input: the presentation layer (immediate
//! feedback), these functions (business rules), and the schema's CHECK and
//! UNIQUE constraints. Validation failures block the action with a
//! descriptive message and no state change.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::{Money, MAX_DISCOUNT_BPS};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name (which doubles as the barcode payload).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an employee login name.
pub fn validate_employee_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "employee name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "employee name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a password before it is hashed.
///
/// ## Rules
/// - At least 3 characters (legacy accounts used 3-digit PINs)
/// - At most 128 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 3,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price. Prices are strictly positive; free items are not a
/// thing in this store.
pub fn validate_price(price: Money, field: &str) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock quantity (inventory levels may be zero).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a sale quantity (a sale line always moves at least one unit).
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a discount in basis points (0% to 100%).
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_DISCOUNT_BPS {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: MAX_DISCOUNT_BPS as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses an expiry date entered as `YYYY-MM-DD`.
///
/// An empty string means "no expiry" and maps to `None`.
pub fn parse_expiry_date(input: &str) -> ValidationResult<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidFormat {
            field: "expiry_date".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_name() {
        assert!(validate_product_name("Milk 1L").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn prices_must_be_positive() {
        assert!(validate_price(Money::from_cents(1), "sell_price").is_ok());
        assert!(validate_price(Money::zero(), "sell_price").is_err());
        assert!(validate_price(Money::from_cents(-100), "cost_price").is_err());
    }

    #[test]
    fn stock_quantity_allows_zero() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(100).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn sale_quantity_must_be_positive() {
        assert!(validate_sale_quantity(1).is_ok());
        assert!(validate_sale_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_sale_quantity(0).is_err());
        assert!(validate_sale_quantity(-3).is_err());
        assert!(validate_sale_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn discount_range() {
        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(10_000).is_ok());
        assert!(validate_discount_bps(10_001).is_err());
    }

    #[test]
    fn expiry_date_parsing() {
        assert_eq!(parse_expiry_date("").unwrap(), None);
        assert_eq!(parse_expiry_date("  ").unwrap(), None);
        assert_eq!(
            parse_expiry_date("2024-06-30").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        assert!(parse_expiry_date("30/06/2024").is_err());
        assert!(parse_expiry_date("2024-13-01").is_err());
    }

    #[test]
    fn passwords() {
        assert!(validate_password("123").is_ok());
        assert!(validate_password("correct horse battery staple").is_ok());
        assert!(validate_password("ab").is_err());
        assert!(validate_password(&"x".repeat(200)).is_err());
    }
}
