//! The keyset pagination cursor for the transaction listing.

use time::Date;

use crate::{Error, models::DatabaseID};

/// The position of the last row the client has seen, under the listing's
/// (date descending, id descending) order.
///
/// The cursor is a pair: a date on its own is ambiguous and an id on its own
/// says nothing about the date ordering, so [PaginationCursor::from_parts]
/// enforces that both fields arrive together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    /// The transaction date of the last row on the previous page.
    pub date: Date,
    /// The transaction id of the last row on the previous page.
    pub id: DatabaseID,
}

impl PaginationCursor {
    /// Combine the two optional request fields into a cursor.
    ///
    /// # Errors
    /// Returns [Error::IncompleteCursor] if exactly one of `date` and `id`
    /// is present.
    pub fn from_parts(date: Option<Date>, id: Option<DatabaseID>) -> Result<Option<Self>, Error> {
        match (date, id) {
            (Some(date), Some(id)) => Ok(Some(Self { date, id })),
            (None, None) => Ok(None),
            _ => Err(Error::IncompleteCursor),
        }
    }
}
