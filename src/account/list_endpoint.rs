//! Defines the endpoint for listing the calling user's accounts.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{Error, UserId, account::core::list_accounts};

use super::create_endpoint::AccountState;

/// A route handler for listing the calling user's accounts.
pub async fn list_accounts_endpoint(State(state): State<AccountState>, user_id: UserId) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match list_accounts(user_id, &connection) {
        Ok(accounts) => Json(accounts).into_response(),
        Err(error) => {
            tracing::error!("could not list accounts: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{UserId, account::core::create_account, initialize_db};

    use super::{AccountState, list_accounts_endpoint};

    #[tokio::test]
    async fn lists_only_the_callers_accounts() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        create_account(UserId::new(1), "Everyday", "Checking", 0.0, &conn).unwrap();
        create_account(UserId::new(2), "Not Yours", "Savings", 0.0, &conn).unwrap();
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = list_accounts_endpoint(State(state), UserId::new(1))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let accounts: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(accounts.as_array().unwrap().len(), 1);
        assert_eq!(accounts[0]["account_name"], "Everyday");
    }
}
