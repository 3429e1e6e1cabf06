//! Defines the endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error, UserId,
    transaction::core::{TransactionId, delete_transaction},
};

use super::create_endpoint::TransactionState;

/// A route handler for deleting a transaction, responds with an
/// acknowledgement message.
pub async fn delete_transaction_endpoint(
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

    match delete_transaction(transaction_id, user_id, &connection) {
        Ok(()) => Json(json!({"message": "Transaction deleted successfully"})).into_response(),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}
