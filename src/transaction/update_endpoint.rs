//! Defines the endpoint for updating an existing transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::Date;

use crate::{
    AppJson, Error, UserId,
    account::AccountId,
    category::CategoryId,
    transaction::TransactionType,
    transaction::core::{TransactionChanges, TransactionId, update_transaction},
};

use super::create_endpoint::TransactionState;

/// The request body for updating a transaction.
///
/// All fields are optional; omitted fields retain their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionBody {
    /// Reattribute the transaction to another account owned by the caller.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Change the transaction's category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Change when the transaction happened.
    #[serde(default)]
    pub transaction_date: Option<Date>,
    /// Change the transaction's description.
    #[serde(default)]
    pub description: Option<String>,
    /// Change the amount of money spent or earned.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Change the transaction to "Income" or "Expense".
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// Change whether the transaction recurs.
    #[serde(default)]
    pub is_recurring: Option<bool>,
}

/// A route handler for updating a transaction, responds with the updated
/// transaction enriched with its account and category names.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    user_id: UserId,
    Path(transaction_id): Path<TransactionId>,
    AppJson(body): AppJson<UpdateTransactionBody>,
) -> Response {
    let transaction_type = match body.transaction_type.as_deref().map(str::parse::<TransactionType>).transpose() {
        Ok(transaction_type) => transaction_type,
        Err(error) => return error.into_response(),
    };

    let changes = TransactionChanges {
        account_id: body.account_id,
        category_id: body.category_id,
        transaction_date: body.transaction_date,
        description: body.description,
        amount: body.amount,
        transaction_type,
        is_recurring: body.is_recurring,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_transaction(transaction_id, user_id, changes, &connection) {
        Ok(details) => Json(details).into_response(),
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}
