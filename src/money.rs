//! Conversion between the database's fixed-point decimal amounts and the
//! integer cents used everywhere else in the application.
//!
//! The two functions are exact inverses for every representable cent value,
//! including negative values. No rounding ever happens here: a decimal that
//! carries sub-cent digits is a data error and is rejected.

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::Error;

/// Convert a fixed-point decimal amount into signed integer cents.
///
/// # Errors
/// Returns [Error::SubCentAmount] if `amount` is not a whole number of cents
/// or does not fit in an `i64`.
pub fn cents_from_decimal(amount: Decimal) -> Result<i64, Error> {
    let lossy = || Error::SubCentAmount(amount.to_string());

    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(lossy)?;

    if !scaled.fract().is_zero() {
        return Err(lossy());
    }

    scaled.to_i64().ok_or_else(lossy)
}

/// Convert signed integer cents into the fixed-point decimal stored in the
/// database, always with two decimal places.
pub fn decimal_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
