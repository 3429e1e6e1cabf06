//! Defines the core data model and database queries for accounts.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, UserId};

/// The id of an account row.
pub type AccountId = i64;

/// A bank account, credit card or cash wallet that transactions are
/// attributed to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The ID of the user who owns the account.
    pub user_id: UserId,
    /// The display name of the account.
    pub account_name: String,
    /// A free-form type tag, e.g. "Checking", "Savings", "Credit Card".
    pub account_type: String,
    /// The cached sum of the signed amounts of the account's transactions,
    /// on top of the opening balance.
    ///
    /// Only ever adjusted with relative deltas by [apply_balance_delta],
    /// never set to an absolute value after creation.
    pub balance: f64,
}

/// Create the account table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                account_name TEXT NOT NULL,
                account_type TEXT NOT NULL,
                balance REAL NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_account_user ON account(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new(row.get(1)?);
    let account_name = row.get(2)?;
    let account_type = row.get(3)?;
    let balance = row.get(4)?;

    Ok(Account {
        id,
        user_id,
        account_name,
        account_type,
        balance,
    })
}

/// Create a new account for `user_id` with an opening balance.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyAccountName] if `account_name` is empty,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_account(
    user_id: UserId,
    account_name: &str,
    account_type: &str,
    opening_balance: f64,
    connection: &Connection,
) -> Result<Account, Error> {
    if account_name.is_empty() {
        return Err(Error::EmptyAccountName);
    }

    let account = connection
        .prepare(
            "INSERT INTO account (user_id, account_name, account_type, balance)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, account_name, account_type, balance",
        )?
        .query_row(
            (user_id.as_i64(), account_name, account_type, opening_balance),
            map_account_row,
        )?;

    Ok(account)
}

/// Retrieve an account by its `id`, restricted to the accounts of `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an account owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account(
    id: AccountId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = connection
        .prepare(
            "SELECT id, user_id, account_name, account_type, balance
             FROM account WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((id, user_id.as_i64()), map_account_row)?;

    Ok(account)
}

/// Retrieve all accounts owned by `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is a SQL error.
pub fn list_accounts(user_id: UserId, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, account_name, account_type, balance
             FROM account WHERE user_id = ?1 ORDER BY account_name ASC",
        )?
        .query_map([user_id.as_i64()], map_account_row)?
        .map(|maybe_account| maybe_account.map_err(Error::SqlError))
        .collect()
}

/// Adjust an account's cached balance by a signed delta.
///
/// This is the only write path for `balance` after account creation. The
/// adjustment is relative (`balance = balance + delta`), so that two units
/// of work touching the same account compose instead of overwriting each
/// other.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn apply_balance_delta(id: AccountId, delta: f64, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
        (delta, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod account_tests {
    use rusqlite::Connection;

    use crate::{Error, UserId, initialize_db};

    use super::{apply_balance_delta, create_account, get_account, list_accounts};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let account = create_account(UserId::new(1), "Everyday", "Checking", 250.0, &conn)
            .expect("Could not create account");

        assert!(account.id > 0);
        assert_eq!(account.user_id, UserId::new(1));
        assert_eq!(account.account_name, "Everyday");
        assert_eq!(account.account_type, "Checking");
        assert_eq!(account.balance, 250.0);
    }

    #[test]
    fn create_fails_on_empty_name() {
        let conn = get_test_connection();

        let result = create_account(UserId::new(1), "", "Checking", 0.0, &conn);

        assert_eq!(result, Err(Error::EmptyAccountName));
    }

    #[test]
    fn get_is_scoped_to_the_owner() {
        let conn = get_test_connection();
        let owner = UserId::new(1);
        let account = create_account(owner, "Everyday", "Checking", 0.0, &conn).unwrap();

        assert_eq!(get_account(account.id, owner, &conn), Ok(account.clone()));
        assert_eq!(
            get_account(account.id, UserId::new(2), &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn list_returns_only_the_owners_accounts() {
        let conn = get_test_connection();
        let owner = UserId::new(1);
        let want = vec![
            create_account(owner, "Everyday", "Checking", 0.0, &conn).unwrap(),
            create_account(owner, "Rainy Day", "Savings", 1000.0, &conn).unwrap(),
        ];
        create_account(UserId::new(2), "Someone Else's", "Checking", 0.0, &conn).unwrap();

        let got = list_accounts(owner, &conn).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn balance_delta_is_relative() {
        let conn = get_test_connection();
        let account = create_account(UserId::new(1), "Everyday", "Checking", 100.0, &conn).unwrap();

        apply_balance_delta(account.id, 25.0, &conn).unwrap();
        apply_balance_delta(account.id, -10.0, &conn).unwrap();

        let got = get_account(account.id, UserId::new(1), &conn).unwrap();
        assert_eq!(got.balance, 115.0);
    }

    #[test]
    fn balance_delta_fails_on_missing_account() {
        let conn = get_test_connection();

        let result = apply_balance_delta(999, 25.0, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }
}
