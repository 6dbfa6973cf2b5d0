//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryData, DatabaseID},
};

/// Handles the creation and retrieval of transaction categories.
pub trait CategoryStore: Send + Sync {
    /// Create a new category and add it to the store.
    fn create(&self, data: CategoryData) -> Result<Category, Error>;

    /// Get a category by its ID.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error>;

    /// Get all categories, ordered by name and then by ID.
    ///
    /// The ordering is what fixes the row order of the summary views, so
    /// implementers must not return categories in insertion order.
    fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Rename an existing category.
    fn update(&self, category_id: DatabaseID, data: CategoryData) -> Result<Category, Error>;

    /// Remove a category. Transactions that referenced it keep existing
    /// without a category.
    fn delete(&self, category_id: DatabaseID) -> Result<(), Error>;
}
