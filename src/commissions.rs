//! Commissions

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Errors specific to commission calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommissionError {
    /// The percentage lies outside the inclusive `[0, 100]` range.
    #[error("commission percentage {0} is outside the 0..=100 range")]
    OutOfRange(Decimal),

    /// A payout calculation overflowed or could not be represented in minor
    /// units.
    #[error("commission conversion overflowed or was not representable")]
    Conversion,
}

/// Checks a commission percentage. `None` means the discount earns no
/// commission and is always acceptable; a present value must lie in
/// `[0, 100]` inclusive.
///
/// # Errors
///
/// - [`CommissionError::OutOfRange`]: the offending value is carried in the
///   error.
pub fn validate_commission_percentage(value: Option<Decimal>) -> Result<(), CommissionError> {
    match value {
        None => Ok(()),
        Some(v) if v >= Decimal::ZERO && v <= Decimal::ONE_HUNDRED => Ok(()),
        Some(v) => Err(CommissionError::OutOfRange(v)),
    }
}

/// Calculates the commission earned on a sale, in minor units, for a
/// percentage in `[0, 100]`. Rounds to whole minor units, midpoint away from
/// zero.
///
/// # Errors
///
/// - [`CommissionError::OutOfRange`]: the percentage fails
///   [`validate_commission_percentage`].
/// - [`CommissionError::Conversion`]: the intermediate product overflowed or
///   the rounded result does not fit in an `i64`.
pub fn commission_amount(percentage: Decimal, sale_minor: i64) -> Result<i64, CommissionError> {
    validate_commission_percentage(Some(percentage))?;

    let Some(product) = percentage.checked_mul(Decimal::from(sale_minor)) else {
        return Err(CommissionError::Conversion);
    };

    let Some(applied) = product.checked_div(Decimal::ONE_HUNDRED) else {
        return Err(CommissionError::Conversion);
    };

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_i64().ok_or(CommissionError::Conversion)
}
