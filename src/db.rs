/*! This module defines traits for interacting with the application's database. */

use rusqlite::{Connection, Error, Row};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type that a row maps to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the
    /// table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading from the column `offset`.
    ///
    /// The offset is useful when tables have been joined and two types are
    /// constructed from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the application tables if they do not already exist.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), crate::Error> {
    use crate::stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore};

    // SQLite leaves foreign keys off unless asked, and the transaction
    // table relies on ON DELETE SET NULL.
    connection.pragma_update(None, "foreign_keys", true)?;

    SQLiteCategoryStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;

    Ok(())
}
