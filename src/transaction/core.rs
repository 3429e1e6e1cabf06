//! Defines the core data model for transactions and the atomic operations
//! that keep account balances consistent with them.
//!
//! Every mutation here runs as a single SQLite transaction that writes the
//! transaction row and adjusts the affected account balances together, so
//! either both changes commit or neither does.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::Date;

use crate::{
    Error, UserId,
    account::{AccountId, apply_balance_delta, get_account},
    category::CategoryId,
    transaction::ledger::{TransactionType, reversal_delta, signed_delta},
};

/// The id of a transaction row.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned
/// against one of the user's accounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the user who owns the transaction.
    pub user_id: UserId,
    /// The account the transaction is attributed to.
    pub account_id: AccountId,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// When the transaction happened.
    pub transaction_date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, as a magnitude.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    pub transaction_type: TransactionType,
    /// Whether the transaction recurs every month.
    pub is_recurring: bool,
}

/// A [Transaction] enriched with the display names of its account and
/// category via read-only joins. This is what the API returns to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDetails {
    /// The stored transaction record.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The display name of the account the transaction is attributed to.
    pub account_name: String,
    /// The display name of the transaction's category, if it has one.
    pub category_name: Option<String>,
}

/// The data needed to create a new [Transaction].
///
/// Use [NewTransaction::new] and the builder methods for the optional
/// fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The account the transaction is attributed to.
    pub account_id: AccountId,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// When the transaction happened.
    pub transaction_date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, as a magnitude.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    pub transaction_type: TransactionType,
    /// Whether the transaction recurs every month.
    pub is_recurring: bool,
}

impl NewTransaction {
    /// Create the data for a new transaction with the required fields.
    pub fn new(
        account_id: AccountId,
        transaction_date: Date,
        amount: f64,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            account_id,
            category_id: None,
            transaction_date,
            description: String::new(),
            amount,
            transaction_type,
            is_recurring: false,
        }
    }

    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Mark the transaction as recurring.
    pub fn recurring(mut self, is_recurring: bool) -> Self {
        self.is_recurring = is_recurring;
        self
    }
}

/// A partial set of changes to apply to an existing [Transaction].
///
/// Fields that are `None` retain their stored values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// Reattribute the transaction to another account owned by the same user.
    pub account_id: Option<AccountId>,
    /// Change the transaction's category.
    pub category_id: Option<CategoryId>,
    /// Change when the transaction happened.
    pub transaction_date: Option<Date>,
    /// Change the transaction's description.
    pub description: Option<String>,
    /// Change the amount of money spent or earned.
    pub amount: Option<f64>,
    /// Change whether the amount was earned or spent.
    pub transaction_type: Option<TransactionType>,
    /// Change whether the transaction recurs.
    pub is_recurring: Option<bool>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                account_id INTEGER NOT NULL,
                category_id INTEGER,
                transaction_date TEXT NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                transaction_type TEXT NOT NULL,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(account_id) REFERENCES account(id),
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by the list endpoint.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date
             ON \"transaction\"(user_id, transaction_date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new(row.get(1)?);
    let account_id = row.get(2)?;
    let category_id = row.get(3)?;
    let transaction_date = row.get(4)?;
    let description = row.get(5)?;
    let amount = row.get(6)?;
    let transaction_type = row.get(7)?;
    let is_recurring = row.get(8)?;

    Ok(Transaction {
        id,
        user_id,
        account_id,
        category_id,
        transaction_date,
        description,
        amount,
        transaction_type,
        is_recurring,
    })
}

fn map_transaction_details_row(row: &Row) -> Result<TransactionDetails, rusqlite::Error> {
    let transaction = map_transaction_row(row)?;
    let account_name = row.get(9)?;
    let category_name = row.get(10)?;

    Ok(TransactionDetails {
        transaction,
        account_name,
        category_name,
    })
}

const TRANSACTION_COLUMNS: &str = "id, user_id, account_id, category_id, transaction_date, \
     description, amount, transaction_type, is_recurring";

const TRANSACTION_DETAILS_QUERY: &str = "SELECT t.id, t.user_id, t.account_id, t.category_id, t.transaction_date, \
            t.description, t.amount, t.transaction_type, t.is_recurring, \
            a.account_name, c.category_name \
     FROM \"transaction\" t \
     LEFT JOIN account a ON t.account_id = a.id \
     LEFT JOIN category c ON t.category_id = c.id";

/// Retrieve a transaction by its `id`, restricted to the transactions of
/// `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id.as_i64()), map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve a transaction with its account and category display names.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction_details(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<TransactionDetails, Error> {
    let details = connection
        .prepare(&format!(
            "{TRANSACTION_DETAILS_QUERY} WHERE t.id = ?1 AND t.user_id = ?2"
        ))?
        .query_row((id, user_id.as_i64()), map_transaction_details_row)?;

    Ok(details)
}

/// Retrieve all of `user_id`'s transactions, newest first, with account and
/// category display names.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is a SQL error.
pub fn list_transactions(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<TransactionDetails>, Error> {
    connection
        .prepare(&format!(
            "{TRANSACTION_DETAILS_QUERY} WHERE t.user_id = ?1 \
             ORDER BY t.transaction_date DESC, t.id DESC"
        ))?
        .query_map([user_id.as_i64()], map_transaction_details_row)?
        .map(|maybe_details| maybe_details.map_err(Error::SqlError))
        .collect()
}

// ============================================================================
// ATOMIC OPERATIONS
// ============================================================================

/// Create a new transaction for `user_id` and apply its signed contribution
/// to the referenced account's balance.
///
/// The row insert and the balance adjustment happen inside one SQLite
/// transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - [Error::NotFound] if the account does not exist or is not owned by `user_id`,
/// - [Error::ConstraintViolation] if the category id violates the foreign key,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new: NewTransaction,
    user_id: UserId,
    connection: &Connection,
) -> Result<TransactionDetails, Error> {
    if new.amount < 0.0 {
        return Err(Error::NegativeAmount(new.amount));
    }

    get_account(new.account_id, user_id, connection)?;

    let unit_of_work = connection.unchecked_transaction()?;

    let transaction = unit_of_work
        .prepare(&format!(
            "INSERT INTO \"transaction\" \
                 (user_id, account_id, category_id, transaction_date, description, \
                  amount, transaction_type, is_recurring) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                user_id.as_i64(),
                new.account_id,
                new.category_id,
                new.transaction_date,
                new.description,
                new.amount,
                new.transaction_type,
                new.is_recurring,
            ],
            map_transaction_row,
        )?;

    apply_balance_delta(
        new.account_id,
        signed_delta(new.amount, new.transaction_type),
        &unit_of_work,
    )?;

    unit_of_work.commit()?;

    get_transaction_details(transaction.id, user_id, connection)
}

/// Apply a partial set of changes to a transaction, keeping the affected
/// account balances consistent.
///
/// Inside one SQLite transaction this reverses the old contribution on the
/// old account, persists the merged field set, then applies the new
/// contribution on the resulting account. The reversal and reapplication
/// happen even when the amount, type and account are unchanged; the two
/// deltas cancel out in that case.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the new amount is negative,
/// - [Error::NotFound] if the transaction, or a reassigned account, does not
///   exist or is not owned by `user_id`,
/// - [Error::ConstraintViolation] if a changed category id violates the
///   foreign key,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserId,
    changes: TransactionChanges,
    connection: &Connection,
) -> Result<TransactionDetails, Error> {
    if let Some(amount) = changes.amount
        && amount < 0.0
    {
        return Err(Error::NegativeAmount(amount));
    }

    let unit_of_work = connection.unchecked_transaction()?;

    let old = get_transaction(id, user_id, &unit_of_work)?;

    apply_balance_delta(
        old.account_id,
        reversal_delta(old.amount, old.transaction_type),
        &unit_of_work,
    )?;

    let account_id = changes.account_id.unwrap_or(old.account_id);
    if account_id != old.account_id {
        // Reassignment must not move the transaction to an account the
        // caller does not own.
        get_account(account_id, user_id, &unit_of_work)?;
    }

    let category_id = changes.category_id.or(old.category_id);
    let transaction_date = changes.transaction_date.unwrap_or(old.transaction_date);
    let description = changes.description.unwrap_or(old.description);
    let amount = changes.amount.unwrap_or(old.amount);
    let transaction_type = changes.transaction_type.unwrap_or(old.transaction_type);
    let is_recurring = changes.is_recurring.unwrap_or(old.is_recurring);

    unit_of_work.execute(
        "UPDATE \"transaction\" \
         SET account_id = ?1, category_id = ?2, transaction_date = ?3, description = ?4, \
             amount = ?5, transaction_type = ?6, is_recurring = ?7 \
         WHERE id = ?8",
        params![
            account_id,
            category_id,
            transaction_date,
            description,
            amount,
            transaction_type,
            is_recurring,
            id,
        ],
    )?;

    apply_balance_delta(
        account_id,
        signed_delta(amount, transaction_type),
        &unit_of_work,
    )?;

    unit_of_work.commit()?;

    get_transaction_details(id, user_id, connection)
}

/// Delete a transaction and remove its contribution from its account's
/// balance, inside one SQLite transaction.
///
/// Deletion is terminal; there is no undelete.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let unit_of_work = connection.unchecked_transaction()?;

    let old = get_transaction(id, user_id, &unit_of_work)?;

    apply_balance_delta(
        old.account_id,
        reversal_delta(old.amount, old.transaction_type),
        &unit_of_work,
    )?;

    unit_of_work.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    unit_of_work.commit()?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
