//! Signed balance deltas for the cached account balance.
//!
//! An account's `balance` column is a denormalized aggregate: it must always
//! equal the signed sum of the active transactions attributed to the
//! account. The functions here compute the one contribution a transaction
//! makes to that sum, and the exact inverse used to undo a prior
//! contribution before a transaction is changed or deleted.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether a transaction adds money to an account or removes it.
///
/// Transaction amounts are stored as magnitudes; this tag carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money flowing into the account.
    Income,
    /// Money flowing out of the account.
    Expense,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "Income" => Ok(TransactionType::Income),
            "Expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The signed contribution a transaction makes to its account's balance.
///
/// `amount` must be a magnitude (>= 0); callers validate this before
/// reaching the ledger.
pub fn signed_delta(amount: f64, transaction_type: TransactionType) -> f64 {
    match transaction_type {
        TransactionType::Income => amount,
        TransactionType::Expense => -amount,
    }
}

/// The delta that undoes a transaction's prior contribution.
///
/// Applying this before applying [signed_delta] of the new state is what
/// keeps updates correct when amount, type and account change independently.
pub fn reversal_delta(amount: f64, transaction_type: TransactionType) -> f64 {
    -signed_delta(amount, transaction_type)
}
