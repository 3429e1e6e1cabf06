//! Defines the core data model and database queries for categories.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, UserId, transaction::TransactionType};

/// The id of a category row.
pub type CategoryId = i64;

/// A label for grouping transactions, e.g. "Groceries" or "Salary".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The ID of the user who owns the category.
    pub user_id: UserId,
    /// The display name of the category.
    pub category_name: String,
    /// Whether the category groups income or expenses.
    pub category_type: TransactionType,
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category_name TEXT NOT NULL,
                category_type TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Category].
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new(row.get(1)?);
    let category_name = row.get(2)?;
    let category_type = row.get(3)?;

    Ok(Category {
        id,
        user_id,
        category_name,
        category_type,
    })
}

/// Create a new category for `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyCategoryName] if `category_name` is empty,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    user_id: UserId,
    category_name: &str,
    category_type: TransactionType,
    connection: &Connection,
) -> Result<Category, Error> {
    if category_name.is_empty() {
        return Err(Error::EmptyCategoryName);
    }

    let category = connection
        .prepare(
            "INSERT INTO category (user_id, category_name, category_type)
             VALUES (?1, ?2, ?3)
             RETURNING id, user_id, category_name, category_type",
        )?
        .query_row(
            (user_id.as_i64(), category_name, category_type),
            map_category_row,
        )?;

    Ok(category)
}

/// Retrieve a category by its `id`, restricted to the categories of `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a category owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(
    id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "SELECT id, user_id, category_name, category_type
             FROM category WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((id, user_id.as_i64()), map_category_row)?;

    Ok(category)
}
