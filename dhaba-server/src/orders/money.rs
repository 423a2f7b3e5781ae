//! Money validation utilities using rust_decimal for precision
//!
//! Line totals and order totals arrive from the client as `f64`; all
//! comparisons happen on `Decimal` with a one-cent tolerance so float
//! representation noise never rejects a legitimate order.

use rust_decimal::prelude::*;

use super::manager::ManagerError;
use shared::models::OrderItem;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

pub fn to_f64(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or(0.0)
}

/// Compare two monetary values within [`MONEY_TOLERANCE`]
pub fn amounts_equal(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() <= MONEY_TOLERANCE
}

#[inline]
fn require_finite(value: f64, field: &str) -> Result<(), ManagerError> {
    if !value.is_finite() {
        return Err(ManagerError::Validation(format!(
            "{} must be a finite number, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Validate an incoming item list and declared order total.
///
/// Enforced at every create/update:
/// - at least one line, each with a non-empty name
/// - positive finite price and quantity, within sane bounds
/// - `line.total == price × quantity` (decimal-exact, one-cent tolerance)
/// - `total_amount == Σ line totals`
pub fn validate_items(items: &[OrderItem], total_amount: f64) -> Result<(), ManagerError> {
    if items.is_empty() {
        return Err(ManagerError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }
    require_finite(total_amount, "total_amount")?;

    let mut sum = Decimal::ZERO;
    for item in items {
        if item.name.trim().is_empty() {
            return Err(ManagerError::Validation(
                "item name must not be empty".to_string(),
            ));
        }
        require_finite(item.price, "price")?;
        require_finite(item.total, "total")?;
        if item.price <= 0.0 {
            return Err(ManagerError::Validation(format!(
                "price must be positive, got {}",
                item.price
            )));
        }
        if item.price > MAX_PRICE {
            return Err(ManagerError::Validation(format!(
                "price exceeds maximum allowed ({}), got {}",
                MAX_PRICE, item.price
            )));
        }
        if item.quantity <= 0 {
            return Err(ManagerError::Validation(format!(
                "quantity must be positive, got {}",
                item.quantity
            )));
        }
        if item.quantity > MAX_QUANTITY {
            return Err(ManagerError::Validation(format!(
                "quantity exceeds maximum allowed ({}), got {}",
                MAX_QUANTITY, item.quantity
            )));
        }

        let expected = to_decimal(item.price) * Decimal::from(item.quantity);
        if (expected - to_decimal(item.total)).abs() > MONEY_TOLERANCE {
            return Err(ManagerError::Validation(format!(
                "line total {} does not match price {} x quantity {}",
                item.total, item.price, item.quantity
            )));
        }
        sum += to_decimal(item.total);
    }

    if (sum - to_decimal(total_amount)).abs() > MONEY_TOLERANCE {
        return Err(ManagerError::Validation(format!(
            "total_amount {} does not match item sum {}",
            total_amount, sum
        )));
    }
    Ok(())
}
