//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryData, DatabaseID},
    stores::CategoryStore,
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&self, data: CategoryData) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();
        let created_at = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO category (name, created_at) VALUES (?1, ?2);",
            (&data.name, created_at),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Category {
            id,
            name: data.name,
            created_at,
        })
    }

    /// Retrieve the category with `category_id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `category_id` does not refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, created_at FROM category WHERE id = :id;")?
            .query_row(&[(":id", &category_id)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve every category, ordered by name and then by ID.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, created_at FROM category ORDER BY name ASC, id ASC;")?
            .query_map([], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    /// Rename the category with `category_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `category_id` does not refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&self, category_id: DatabaseID, data: CategoryData) -> Result<Category, Error> {
        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE category SET name = ?1 WHERE id = ?2;",
            (&data.name, category_id),
        )?;

        if rows_updated == 0 {
            return Err(Error::NotFound);
        }

        self.get(category_id)
    }

    /// Remove the category with `category_id`.
    ///
    /// Transactions referencing the category keep existing; their category
    /// reference is cleared by the schema's `ON DELETE SET NULL`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `category_id` does not refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, category_id: DatabaseID) -> Result<(), Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM category WHERE id = ?1;", (category_id,))?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Category {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            created_at: row.get(offset + 2)?,
        })
    }
}
