//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppJson, AppState, Error, UserId, account::core::create_account};

/// The state needed to create or list accounts.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountBody {
    /// The display name of the account.
    pub account_name: String,
    /// A free-form type tag, e.g. "Checking".
    pub account_type: String,
    /// The opening balance, zero when omitted.
    #[serde(default)]
    pub balance: f64,
}

/// A route handler for creating a new account for the calling user.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    user_id: UserId,
    AppJson(body): AppJson<CreateAccountBody>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_account(
        user_id,
        &body.account_name,
        &body.account_type,
        body.balance,
        &connection,
    ) {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(error) => {
            tracing::error!("could not create account: {error}");
            error.into_response()
        }
    }
}
