//! Groups a year's transactions into monthly totals.
//!
//! Everything here is computed fresh from the store on each call; nothing is
//! cached or persisted. Sums are exact integer cents.

use std::collections::BTreeMap;

use time::{Date, Month};

use crate::{
    Error,
    models::DatabaseID,
    stores::{TransactionQuery, TransactionStore},
};

/// The total amount for one category in one month of a year. Derived data,
/// recomputed per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCategoryTotal {
    /// The category the total belongs to.
    pub category_id: DatabaseID,
    /// The month of the year, 1 through 12.
    pub month: u8,
    /// The total in integer cents.
    pub amount_cents: i64,
}

/// The signed total across all categories for one month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// The month of the year, 1 through 12.
    pub month: u8,
    /// The signed total in integer cents.
    pub amount_cents: i64,
}

/// Build the query covering every transaction dated within `year`.
///
/// # Errors
/// Returns [Error::InvalidYear] if `year` is not positive or cannot be
/// represented as a calendar year.
fn year_query(year: i32) -> Result<TransactionQuery, Error> {
    if year <= 0 {
        return Err(Error::InvalidYear(year));
    }

    let start = Date::from_calendar_date(year, Month::January, 1)
        .map_err(|_| Error::InvalidYear(year))?;
    let end = Date::from_calendar_date(year, Month::December, 31)
        .map_err(|_| Error::InvalidYear(year))?;

    Ok(TransactionQuery {
        from_date: Some(start),
        to_date: Some(end),
        ..Default::default()
    })
}

/// Sum the magnitude of each category's spending per month of `year`.
///
/// Only transactions with a category and a negative amount contribute.
/// Months in which a category saw no spending produce no entry at all.
/// Results are ordered by category ID ascending, then month ascending.
///
/// # Errors
/// Returns [Error::InvalidYear] for a non-positive year (checked before any
/// store access), or the store's error if the fetch fails.
pub fn monthly_spending_by_category<T: TransactionStore>(
    store: &T,
    year: i32,
) -> Result<Vec<MonthlyCategoryTotal>, Error> {
    let query = year_query(year)?;
    let mut totals: BTreeMap<(DatabaseID, u8), i64> = BTreeMap::new();

    for transaction in store.get_query(query)? {
        let Some(category_id) = transaction.category_id else {
            continue;
        };
        if transaction.amount_cents >= 0 {
            continue;
        }

        let month = u8::from(transaction.date.month());
        *totals.entry((category_id, month)).or_insert(0) += -transaction.amount_cents;
    }

    Ok(collect_category_totals(totals))
}

/// Sum each category's income per month of `year`.
///
/// The counterpart of [monthly_spending_by_category] for positive amounts,
/// which are kept as-is rather than negated.
///
/// # Errors
/// Returns [Error::InvalidYear] for a non-positive year (checked before any
/// store access), or the store's error if the fetch fails.
pub fn monthly_income_by_category<T: TransactionStore>(
    store: &T,
    year: i32,
) -> Result<Vec<MonthlyCategoryTotal>, Error> {
    let query = year_query(year)?;
    let mut totals: BTreeMap<(DatabaseID, u8), i64> = BTreeMap::new();

    for transaction in store.get_query(query)? {
        let Some(category_id) = transaction.category_id else {
            continue;
        };
        if transaction.amount_cents <= 0 {
            continue;
        }

        let month = u8::from(transaction.date.month());
        *totals.entry((category_id, month)).or_insert(0) += transaction.amount_cents;
    }

    Ok(collect_category_totals(totals))
}

/// Sum the signed amounts of every transaction per month of `year`,
/// including transactions without a category.
///
/// This feeds the monthly savings view, so amounts keep their sign and no
/// category grouping is applied. Results are ordered by month ascending.
///
/// # Errors
/// Returns [Error::InvalidYear] for a non-positive year (checked before any
/// store access), or the store's error if the fetch fails.
pub fn monthly_net_totals<T: TransactionStore>(
    store: &T,
    year: i32,
) -> Result<Vec<MonthlyTotal>, Error> {
    let query = year_query(year)?;
    let mut totals: BTreeMap<u8, i64> = BTreeMap::new();

    for transaction in store.get_query(query)? {
        let month = u8::from(transaction.date.month());
        *totals.entry(month).or_insert(0) += transaction.amount_cents;
    }

    Ok(totals
        .into_iter()
        .map(|(month, amount_cents)| MonthlyTotal {
            month,
            amount_cents,
        })
        .collect())
}

fn collect_category_totals(
    totals: BTreeMap<(DatabaseID, u8), i64>,
) -> Vec<MonthlyCategoryTotal> {
    totals
        .into_iter()
        .filter(|(_, amount_cents)| *amount_cents != 0)
        .map(|((category_id, month), amount_cents)| MonthlyCategoryTotal {
            category_id,
            month,
            amount_cents,
        })
        .collect()
}
