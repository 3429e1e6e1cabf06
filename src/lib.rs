//! Findash is a multi-tenant personal-finance tracker.
//!
//! This library provides a JSON REST API for managing accounts and the
//! income/expense transactions attributed to them. Each account carries a
//! cached balance that is kept consistent with its transactions by the
//! operations in the [transaction] module.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

pub mod account;
mod app_state;
pub mod category;
mod db;
pub mod endpoints;
mod routing;
pub mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use user::UserId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// A JSON request body.
///
/// Wraps [axum::Json] so that a malformed or incomplete body is reported as
/// a 400 with the application's JSON error shape, the same as the other
/// validation failures, rather than axum's 422 rejection.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(Error))]
pub struct AppJson<T>(pub T);

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction amount was negative.
    ///
    /// Amounts are stored as magnitudes, the transaction type carries the
    /// sign.
    #[error("transaction amounts must not be negative, got {0}")]
    NegativeAmount(f64),

    /// A string that is neither "Income" nor "Expense" was used as a
    /// transaction type.
    #[error("\"{0}\" is not a valid transaction type, expected Income or Expense")]
    InvalidTransactionType(String),

    /// An empty string was used to create an account name.
    #[error("Account name cannot be empty")]
    EmptyAccountName,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A request body could not be parsed as the expected JSON shape.
    #[error("{0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// Also returned when the resource exists but belongs to another user,
    /// so that clients cannot probe for other users' data.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A storage-level integrity constraint (foreign key, uniqueness) failed
    /// during a unit of work. The unit of work has been rolled back.
    #[error("a database constraint was violated: {0}")]
    ConstraintViolation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(sql_error, ref desc)
                if sql_error.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::ConstraintViolation(desc.clone().unwrap_or_else(|| sql_error.to_string()))
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Error::NegativeAmount(_)
            | Error::InvalidTransactionType(_)
            | Error::EmptyAccountName
            | Error::EmptyCategoryName
            | Error::InvalidRequestBody(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Constraint violations and SQL errors abort the unit of work.
            // The details are for the server logs, not the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
