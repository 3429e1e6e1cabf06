//! Defines the endpoints for reading transactions.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, UserId,
    transaction::core::{TransactionId, get_transaction_details, list_transactions},
};

use super::create_endpoint::TransactionState;

/// A route handler for listing the calling user's transactions, newest
/// first, enriched with account and category names.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    user_id: UserId,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match list_transactions(user_id, &connection) {
        Ok(details) => Json(details).into_response(),
        Err(error) => {
            tracing::error!("could not list transactions: {error}");
            error.into_response()
        }
    }
}

/// A route handler for getting a single transaction by its id, enriched
/// with account and category names.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    user_id: UserId,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_transaction_details(transaction_id, user_id, &connection) {
        Ok(details) => Json(details).into_response(),
        Err(error) => {
            tracing::error!("could not get transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}
