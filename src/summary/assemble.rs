//! Pivots monthly aggregates into the fixed-width tables of the summary
//! views.
//!
//! The pivot is catalog-driven: one 12-slot row is allocated up front for
//! every known category, then aggregate values are scattered into the slots
//! by category ID. Output order therefore depends only on the catalog, never
//! on the order aggregates arrive in, and every category appears even when
//! it has no activity at all.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Category, DatabaseID};

use super::aggregation::{MonthlyCategoryTotal, MonthlyTotal};

/// The number of slots in every monthly vector.
pub const MONTHS_PER_YEAR: usize = 12;

/// One category's row in a summary section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// The category this row belongs to.
    pub category_id: DatabaseID,
    /// The category's total for each month, January first, in cents.
    pub values: Vec<i64>,
    /// The sum of `values` in cents.
    pub total: i64,
    /// `total` divided by 12, truncated toward zero.
    pub average: i64,
}

/// A pivoted table with one row per catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarySection {
    /// One row per catalog category, in catalog order.
    pub rows: Vec<SummaryRow>,
    /// The per-month sums across all rows, in cents.
    pub column_totals: Vec<i64>,
    /// The sum of every row total, in cents.
    pub total: i64,
}

/// Pivot `totals` against the category catalog.
///
/// Aggregates for a category missing from `categories` (deleted since the
/// catalog snapshot was taken) are dropped, as are aggregates with a month
/// outside 1 through 12. Neither should normally occur and neither invents
/// a row this engine cannot attribute.
pub fn build_section(categories: &[Category], totals: &[MonthlyCategoryTotal]) -> SummarySection {
    let mut values_by_category: HashMap<DatabaseID, [i64; MONTHS_PER_YEAR]> = categories
        .iter()
        .map(|category| (category.id, [0; MONTHS_PER_YEAR]))
        .collect();

    for total in totals {
        let Some(values) = values_by_category.get_mut(&total.category_id) else {
            continue;
        };
        let Some(slot) = (total.month as usize)
            .checked_sub(1)
            .filter(|index| *index < MONTHS_PER_YEAR)
        else {
            continue;
        };

        values[slot] = total.amount_cents;
    }

    let mut rows = Vec::with_capacity(categories.len());
    let mut column_totals = vec![0_i64; MONTHS_PER_YEAR];
    let mut grand_total = 0_i64;

    for category in categories {
        let values = values_by_category[&category.id];
        let total: i64 = values.iter().sum();

        for (column_total, value) in column_totals.iter_mut().zip(values) {
            *column_total += value;
        }
        grand_total += total;

        rows.push(SummaryRow {
            category_id: category.id,
            values: values.to_vec(),
            total,
            // Integer division truncates toward zero, so a small negative
            // total averages to 0 rather than -1.
            average: total / MONTHS_PER_YEAR as i64,
        });
    }

    SummarySection {
        rows,
        column_totals,
        total: grand_total,
    }
}

/// Scatter net monthly totals into a single 12-slot vector and sum it.
///
/// Unlike [build_section] there is no pivot and no averaging: the savings
/// view is one row of signed sums.
pub fn build_monthly_values(totals: &[MonthlyTotal]) -> (Vec<i64>, i64) {
    let mut values = vec![0_i64; MONTHS_PER_YEAR];

    for total in totals {
        let Some(slot) = (total.month as usize)
            .checked_sub(1)
            .filter(|index| *index < MONTHS_PER_YEAR)
        else {
            continue;
        };

        values[slot] = total.amount_cents;
    }

    let total = values.iter().sum();

    (values, total)
}
