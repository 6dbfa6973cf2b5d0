//! Implements a SQLite backed transaction store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rust_decimal::Decimal;
use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Transaction, TransactionData},
    money,
    stores::{
        TransactionStore,
        transaction::{TransactionKind, TransactionQuery},
    },
};

/// Stores transactions in a SQLite database.
///
/// Amounts cross this boundary as integer cents but are stored as fixed-point
/// decimal text (e.g. `-12.34`), converted through [crate::money] on every
/// read and write. A stored amount with sub-cent digits is reported as
/// [Error::SubCentAmount] rather than silently truncated.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// A transaction row as stored, with the amount still in decimal text.
pub struct TransactionRow {
    id: DatabaseID,
    date: time::Date,
    category_id: Option<DatabaseID>,
    amount: String,
    description: Option<String>,
    created_at: OffsetDateTime,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction, Error> {
        let amount = Decimal::from_str(&self.amount)
            .map_err(|_| Error::SubCentAmount(self.amount.clone()))?;

        Ok(Transaction {
            id: self.id,
            date: self.date,
            category_id: self.category_id,
            amount_cents: money::cents_from_decimal(amount)?,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCategory] if `data.category_id` does not refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, data: TransactionData) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();
        let created_at = OffsetDateTime::now_utc();
        let amount = money::decimal_from_cents(data.amount_cents).to_string();

        connection
            .execute(
                "INSERT INTO \"transaction\" (date, category_id, amount, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    data.date,
                    data.category_id,
                    &amount,
                    &data.description,
                    created_at,
                ),
            )
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed.
                // The client tried to reference a non-existent category.
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                    Error::InvalidCategory(data.category_id)
                }
                error => error.into(),
            })?;

        Ok(Transaction {
            id: connection.last_insert_rowid(),
            date: data.date,
            category_id: data.category_id,
            amount_cents: data.amount_cents,
            description: data.description,
            created_at,
        })
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        let row = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, date, category_id, amount, description, created_at
                 FROM \"transaction\" WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)?;

        row.into_transaction()
    }

    /// Overwrite the client-supplied fields of the transaction with `id`.
    ///
    /// The ID and creation timestamp are immutable.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - [Error::InvalidCategory] if `data.category_id` does not refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&self, id: DatabaseID, data: TransactionData) -> Result<Transaction, Error> {
        let amount = money::decimal_from_cents(data.amount_cents).to_string();

        let rows_updated = self
            .connection
            .lock()
            .unwrap()
            .execute(
                "UPDATE \"transaction\"
                 SET date = ?1, category_id = ?2, amount = ?3, description = ?4
                 WHERE id = ?5",
                (data.date, data.category_id, &amount, &data.description, id),
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                    Error::InvalidCategory(data.category_id)
                }
                error => error.into(),
            })?;

        if rows_updated == 0 {
            return Err(Error::NotFound);
        }

        self.get(id)
    }

    /// Remove the transaction with `id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, id: DatabaseID) -> Result<(), Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Query for transactions in the database.
    ///
    /// Results are always ordered by date descending and then by ID
    /// descending, regardless of the filters applied.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is a SQL
    /// error, or an [Error::SubCentAmount] if a stored amount cannot be
    /// expressed in whole cents.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![
            "SELECT id, date, category_id, amount, description, created_at FROM \"transaction\""
                .to_string(),
        ];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(from_date) = query.from_date {
            where_clause_parts.push(format!("date >= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(from_date.to_string()));
        }

        if let Some(to_date) = query.to_date {
            where_clause_parts.push(format!("date <= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(to_date.to_string()));
        }

        if let Some(category_id) = query.category_id {
            where_clause_parts.push(format!("category_id = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(category_id));
        }

        match query.kind {
            Some(TransactionKind::Spending) => {
                where_clause_parts.push("CAST(amount AS REAL) < 0.0".to_string());
            }
            Some(TransactionKind::Income) => {
                where_clause_parts.push("CAST(amount AS REAL) > 0.0".to_string());
            }
            None => {}
        }

        if let Some(after) = query.after {
            // Keyset predicate: strictly below the cursor under the
            // (date DESC, id DESC) order.
            where_clause_parts.push(format!(
                "(date, id) < (?{}, ?{})",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(after.date.to_string()));
            query_parameters.push(Value::Integer(after.id));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        query_string_parts.push("ORDER BY date DESC, id DESC".to_string());

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit}"));
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        let rows: Vec<TransactionRow> = self
            .connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect::<Result<_, _>>()?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
                amount TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = TransactionRow;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(TransactionRow {
            id: row.get(offset)?,
            date: row.get(offset + 1)?,
            category_id: row.get(offset + 2)?,
            amount: row.get(offset + 3)?,
            description: row.get(offset + 4)?,
            created_at: row.get(offset + 5)?,
        })
    }
}

#[cfg(test)]
mod transaction_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        cursor::PaginationCursor,
        db::initialize,
        models::{CategoryData, DatabaseID, Transaction, TransactionData},
        stores::{
            CategoryStore, TransactionKind, TransactionQuery, TransactionStore,
            sqlite::SQLiteCategoryStore,
        },
    };

    use super::SQLiteTransactionStore;

    fn get_test_stores() -> (SQLiteTransactionStore, SQLiteCategoryStore) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        (
            SQLiteTransactionStore::new(connection.clone()),
            SQLiteCategoryStore::new(connection),
        )
    }

    fn create(
        store: &SQLiteTransactionStore,
        date: Date,
        amount_cents: i64,
        category_id: Option<DatabaseID>,
    ) -> Transaction {
        store
            .create(TransactionData {
                date,
                category_id,
                amount_cents,
                description: None,
            })
            .unwrap()
    }

    #[test]
    fn create_transaction_round_trips_amount() {
        let (store, _) = get_test_stores();

        let transaction = store
            .create(TransactionData {
                date: date!(2030 - 01 - 05),
                category_id: None,
                amount_cents: -1234,
                description: Some("greengrocer".to_string()),
            })
            .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount_cents, -1234);
        assert_eq!(store.get(transaction.id), Ok(transaction));
    }

    #[test]
    fn amounts_are_stored_as_decimal_text() {
        let (store, _) = get_test_stores();
        let transaction = create(&store, date!(2030 - 01 - 05), -1234, None);

        let stored: String = store
            .connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT amount FROM \"transaction\" WHERE id = ?1",
                (transaction.id,),
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(stored, "-12.34");
    }

    #[test]
    fn sub_cent_amount_in_database_is_reported() {
        let (store, _) = get_test_stores();
        let transaction = create(&store, date!(2030 - 01 - 05), 100, None);

        store
            .connection
            .lock()
            .unwrap()
            .execute(
                "UPDATE \"transaction\" SET amount = '1.005' WHERE id = ?1",
                (transaction.id,),
            )
            .unwrap();

        assert_eq!(
            store.get(transaction.id),
            Err(Error::SubCentAmount("1.005".to_string()))
        );
    }

    #[test]
    fn create_transaction_with_invalid_category_fails() {
        let (store, _) = get_test_stores();

        let got = store.create(TransactionData {
            date: date!(2030 - 01 - 05),
            category_id: Some(999),
            amount_cents: -1000,
            description: None,
        });

        assert_eq!(got, Err(Error::InvalidCategory(Some(999))));
    }

    #[test]
    fn get_transaction_with_invalid_id_returns_not_found() {
        let (store, _) = get_test_stores();

        assert_eq!(store.get(999), Err(Error::NotFound));
    }

    #[test]
    fn update_transaction_overwrites_fields() {
        let (store, categories) = get_test_stores();
        let category = categories
            .create(CategoryData {
                name: "Groceries".to_string(),
            })
            .unwrap();
        let transaction = create(&store, date!(2030 - 01 - 05), -1000, None);

        let updated = store
            .update(
                transaction.id,
                TransactionData {
                    date: date!(2030 - 02 - 01),
                    category_id: Some(category.id),
                    amount_cents: -2000,
                    description: Some("more groceries".to_string()),
                },
            )
            .unwrap();

        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.created_at, transaction.created_at);
        assert_eq!(updated.date, date!(2030 - 02 - 01));
        assert_eq!(updated.category_id, Some(category.id));
        assert_eq!(updated.amount_cents, -2000);
    }

    #[test]
    fn update_missing_transaction_returns_not_found() {
        let (store, _) = get_test_stores();

        let got = store.update(
            999,
            TransactionData {
                date: date!(2030 - 01 - 05),
                category_id: None,
                amount_cents: 1,
                description: None,
            },
        );

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn delete_transaction_removes_it() {
        let (store, _) = get_test_stores();
        let transaction = create(&store, date!(2030 - 01 - 05), -1000, None);

        store.delete(transaction.id).unwrap();

        assert_eq!(store.get(transaction.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_returns_not_found() {
        let (store, _) = get_test_stores();

        assert_eq!(store.delete(999), Err(Error::NotFound));
    }

    #[test]
    fn deleting_category_clears_transaction_reference() {
        let (store, categories) = get_test_stores();
        let category = categories
            .create(CategoryData {
                name: "Groceries".to_string(),
            })
            .unwrap();
        let transaction = create(&store, date!(2030 - 01 - 05), -1000, Some(category.id));

        categories.delete(category.id).unwrap();

        assert_eq!(store.get(transaction.id).unwrap().category_id, None);
    }

    #[test]
    fn get_query_orders_by_date_then_id_descending() {
        let (store, _) = get_test_stores();
        let older = create(&store, date!(2030 - 01 - 05), -1000, None);
        let newest_first_insert = create(&store, date!(2030 - 01 - 20), 2000, None);
        let newest_second_insert = create(&store, date!(2030 - 01 - 20), -3000, None);

        let got = store.get_query(TransactionQuery::default()).unwrap();

        assert_eq!(got, vec![newest_second_insert, newest_first_insert, older]);
    }

    #[test]
    fn get_query_filters_by_inclusive_date_range() {
        let (store, _) = get_test_stores();
        create(&store, date!(2030 - 01 - 04), -1, None);
        let on_lower_bound = create(&store, date!(2030 - 01 - 05), -2, None);
        let on_upper_bound = create(&store, date!(2030 - 01 - 10), -3, None);
        create(&store, date!(2030 - 01 - 11), -4, None);

        let got = store
            .get_query(TransactionQuery {
                from_date: Some(date!(2030 - 01 - 05)),
                to_date: Some(date!(2030 - 01 - 10)),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got, vec![on_upper_bound, on_lower_bound]);
    }

    #[test]
    fn get_query_category_filter_excludes_uncategorised() {
        let (store, categories) = get_test_stores();
        let category = categories
            .create(CategoryData {
                name: "Groceries".to_string(),
            })
            .unwrap();
        let in_category = create(&store, date!(2030 - 01 - 05), -1000, Some(category.id));
        create(&store, date!(2030 - 01 - 06), -2000, None);

        let got = store
            .get_query(TransactionQuery {
                category_id: Some(category.id),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got, vec![in_category]);
    }

    #[test]
    fn get_query_kind_filter_excludes_zero_amounts() {
        let (store, _) = get_test_stores();
        let spending = create(&store, date!(2030 - 01 - 05), -1000, None);
        let income = create(&store, date!(2030 - 01 - 06), 2000, None);
        create(&store, date!(2030 - 01 - 07), 0, None);

        let got_spending = store
            .get_query(TransactionQuery {
                kind: Some(TransactionKind::Spending),
                ..Default::default()
            })
            .unwrap();
        let got_income = store
            .get_query(TransactionQuery {
                kind: Some(TransactionKind::Income),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got_spending, vec![spending]);
        assert_eq!(got_income, vec![income]);
    }

    #[test]
    fn get_query_applies_limit() {
        let (store, _) = get_test_stores();
        for day in 1..=5 {
            create(
                &store,
                Date::from_calendar_date(2030, time::Month::January, day).unwrap(),
                -100,
                None,
            );
        }

        let got = store
            .get_query(TransactionQuery {
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].date, date!(2030 - 01 - 05));
        assert_eq!(got[1].date, date!(2030 - 01 - 04));
    }

    #[test]
    fn paging_with_cursor_matches_unpaginated_query() {
        let (store, _) = get_test_stores();
        // Duplicate dates so the id tie-break matters.
        for i in 0..10 {
            let day = 1 + (i % 4);
            create(
                &store,
                Date::from_calendar_date(2030, time::Month::March, day).unwrap(),
                -100 * (i as i64 + 1),
                None,
            );
        }

        let all = store.get_query(TransactionQuery::default()).unwrap();

        let mut paged = Vec::new();
        let mut after: Option<PaginationCursor> = None;
        loop {
            let page = store
                .get_query(TransactionQuery {
                    limit: Some(3),
                    after,
                    ..Default::default()
                })
                .unwrap();

            let Some(last) = page.last() else { break };
            after = Some(PaginationCursor {
                date: last.date,
                id: last.id,
            });
            paged.extend(page);
        }

        assert_eq!(paged, all);
    }
}
