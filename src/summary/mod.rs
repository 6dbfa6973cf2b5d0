//! The reporting views: the transactions summary and monthly savings.
//!
//! Both views cover a single calendar year and are computed fresh per
//! request from the category catalog and the transaction store.

pub mod aggregation;
pub mod assemble;

use serde::Serialize;

use crate::{
    Error,
    stores::{CategoryStore, TransactionStore},
};

pub use assemble::{SummaryRow, SummarySection};

/// Spending and income pivoted per category per month for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionsSummary {
    /// The year the summary covers.
    pub year: i32,
    /// The month numbers 1 through 12, matching the value vectors.
    pub months: Vec<u8>,
    /// Spending magnitudes per category per month.
    pub spending: SummarySection,
    /// Income per category per month.
    pub income: SummarySection,
}

/// The net amount saved (or lost) in each month of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySavings {
    /// The year the savings cover.
    pub year: i32,
    /// The month numbers 1 through 12, matching `values`.
    pub months: Vec<u8>,
    /// The signed net total for each month, in cents.
    pub values: Vec<i64>,
    /// The sum of `values`, in cents.
    pub total: i64,
}

fn month_numbers() -> Vec<u8> {
    (1..=12).collect()
}

/// Compute the transactions summary for `year`.
///
/// The category catalog is snapshotted once and drives the row set and row
/// order of both sections; a category with no transactions in the year still
/// appears with all-zero values.
///
/// # Errors
/// Returns [Error::InvalidYear] for a non-positive year, before any store
/// access, or the store's error if a fetch fails. A failed fetch aborts the
/// whole summary; there is no partial result.
pub fn transactions_summary<C, T>(
    categories: &C,
    transactions: &T,
    year: i32,
) -> Result<TransactionsSummary, Error>
where
    C: CategoryStore,
    T: TransactionStore,
{
    let spending_totals = aggregation::monthly_spending_by_category(transactions, year)?;
    let income_totals = aggregation::monthly_income_by_category(transactions, year)?;
    let catalog = categories.get_all()?;

    Ok(TransactionsSummary {
        year,
        months: month_numbers(),
        spending: assemble::build_section(&catalog, &spending_totals),
        income: assemble::build_section(&catalog, &income_totals),
    })
}

/// Compute the monthly savings vector for `year`.
///
/// # Errors
/// Returns [Error::InvalidYear] for a non-positive year, before any store
/// access, or the store's error if the fetch fails.
pub fn monthly_savings<T>(transactions: &T, year: i32) -> Result<MonthlySavings, Error>
where
    T: TransactionStore,
{
    let net_totals = aggregation::monthly_net_totals(transactions, year)?;
    let (values, total) = assemble::build_monthly_values(&net_totals);

    Ok(MonthlySavings {
        year,
        months: month_numbers(),
        values,
        total,
    })
}

#[cfg(test)]
mod summary_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        db::initialize,
        models::{CategoryData, DatabaseID, TransactionData},
        stores::{
            CategoryStore, TransactionStore,
            sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
        },
    };

    use super::{monthly_savings, transactions_summary};

    fn get_test_stores() -> (SQLiteCategoryStore, SQLiteTransactionStore) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        (
            SQLiteCategoryStore::new(connection.clone()),
            SQLiteTransactionStore::new(connection),
        )
    }

    fn create_category(store: &SQLiteCategoryStore, name: &str) -> DatabaseID {
        store
            .create(CategoryData {
                name: name.to_string(),
            })
            .unwrap()
            .id
    }

    fn create_transaction(
        store: &SQLiteTransactionStore,
        date: Date,
        amount_cents: i64,
        category_id: Option<DatabaseID>,
    ) {
        store
            .create(TransactionData {
                date,
                category_id,
                amount_cents,
                description: None,
            })
            .unwrap();
    }

    #[test]
    fn summary_reports_spending_and_income_sections() {
        let (categories, transactions) = get_test_stores();
        let a = create_category(&categories, "A");
        let b = create_category(&categories, "B");

        create_transaction(&transactions, date!(2030 - 01 - 05), -1000, Some(a));
        create_transaction(&transactions, date!(2030 - 01 - 20), 2000, Some(a));
        create_transaction(&transactions, date!(2030 - 02 - 01), -3000, Some(b));
        create_transaction(&transactions, date!(2030 - 03 - 01), 4000, Some(b));

        let summary = transactions_summary(&categories, &transactions, 2030).unwrap();

        assert_eq!(summary.year, 2030);
        assert_eq!(summary.months, (1..=12).collect::<Vec<u8>>());

        let spending = &summary.spending;
        assert_eq!(spending.rows[0].category_id, a);
        assert_eq!(spending.rows[0].values[0], 1000);
        assert_eq!(spending.rows[0].total, 1000);
        assert_eq!(spending.rows[0].average, 83);
        assert_eq!(spending.rows[1].category_id, b);
        assert_eq!(spending.rows[1].values[1], 3000);
        assert_eq!(spending.rows[1].total, 3000);
        assert_eq!(spending.rows[1].average, 250);
        assert_eq!(spending.column_totals[0], 1000);
        assert_eq!(spending.column_totals[1], 3000);
        assert_eq!(spending.total, 4000);

        let income = &summary.income;
        assert_eq!(income.rows[0].total, 2000);
        assert_eq!(income.rows[0].average, 166);
        assert_eq!(income.rows[1].total, 4000);
        assert_eq!(income.rows[1].average, 333);
        assert_eq!(income.total, 6000);
    }

    #[test]
    fn summary_includes_idle_categories() {
        let (categories, transactions) = get_test_stores();
        let idle = create_category(&categories, "Idle");
        let busy = create_category(&categories, "Busy");
        create_transaction(&transactions, date!(2030 - 01 - 05), -1000, Some(busy));

        let summary = transactions_summary(&categories, &transactions, 2030).unwrap();

        let idle_row = summary
            .spending
            .rows
            .iter()
            .find(|row| row.category_id == idle)
            .expect("idle category missing from summary");
        assert_eq!(idle_row.values, vec![0; 12]);
        assert_eq!(idle_row.total, 0);
        assert_eq!(idle_row.average, 0);
    }

    #[test]
    fn savings_sums_signed_amounts_per_month() {
        let (categories, transactions) = get_test_stores();
        let a = create_category(&categories, "A");

        create_transaction(&transactions, date!(2030 - 01 - 05), -1000, Some(a));
        create_transaction(&transactions, date!(2030 - 01 - 20), 5000, None);
        create_transaction(&transactions, date!(2030 - 02 - 01), -1000, None);

        let savings = monthly_savings(&transactions, 2030).unwrap();

        assert_eq!(savings.values[0], 4000);
        assert_eq!(savings.values[1], -1000);
        assert_eq!(savings.values[2..], [0; 10]);
        assert_eq!(savings.total, 3000);
    }

    #[test]
    fn non_positive_year_is_a_validation_error() {
        let (categories, transactions) = get_test_stores();

        assert_eq!(
            transactions_summary(&categories, &transactions, 0),
            Err(Error::InvalidYear(0))
        );
        assert_eq!(monthly_savings(&transactions, -5), Err(Error::InvalidYear(-5)));
    }
}
