//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppJson, AppState, Error, UserId,
    account::AccountId,
    category::CategoryId,
    transaction::TransactionType,
    transaction::core::{NewTransaction, create_transaction},
};

/// The state needed to read or mutate transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionBody {
    /// The account the transaction is attributed to.
    pub account_id: AccountId,
    /// The category the transaction belongs to, if any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// When the transaction happened.
    pub transaction_date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The value of the transaction in dollars, as a magnitude.
    pub amount: f64,
    /// "Income" or "Expense".
    pub transaction_type: String,
    /// Whether the transaction recurs every month.
    #[serde(default)]
    pub is_recurring: bool,
}

/// A route handler for creating a new transaction, responds with the created
/// transaction enriched with its account and category names.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    user_id: UserId,
    AppJson(body): AppJson<CreateTransactionBody>,
) -> Response {
    let transaction_type = match body.transaction_type.parse::<TransactionType>() {
        Ok(transaction_type) => transaction_type,
        Err(error) => return error.into_response(),
    };

    let new_transaction = NewTransaction::new(
        body.account_id,
        body.transaction_date,
        body.amount,
        transaction_type,
    )
    .category_id(body.category_id)
    .description(&body.description)
    .recurring(body.is_recurring);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(new_transaction, user_id, &connection) {
        Ok(details) => (StatusCode::CREATED, Json(details)).into_response(),
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_response()
        }
    }
}
