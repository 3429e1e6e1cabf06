//! Defines the endpoint for creating a new category.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppJson, AppState, Error, UserId, category::core::create_category,
    transaction::TransactionType,
};

/// The state needed to create a category.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryBody {
    /// The display name of the category.
    pub category_name: String,
    /// "Income" or "Expense".
    pub category_type: String,
}

/// A route handler for creating a new category for the calling user.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    user_id: UserId,
    AppJson(body): AppJson<CreateCategoryBody>,
) -> Response {
    let category_type = match body.category_type.parse::<TransactionType>() {
        Ok(category_type) => category_type,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_category(user_id, &body.category_name, category_type, &connection) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(error) => {
            tracing::error!("could not create category: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{AppJson, UserId, category::core::get_category, initialize_db};

    use super::{CategoryState, CreateCategoryBody, create_category_endpoint};

    fn get_test_state() -> CategoryState {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();

        CategoryState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_category() {
        let state = get_test_state();
        let body = CreateCategoryBody {
            category_name: "Groceries".to_owned(),
            category_type: "Expense".to_owned(),
        };

        let response = create_category_endpoint(State(state.clone()), UserId::new(1), AppJson(body))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let connection = state.db_connection.lock().unwrap();
        let category = get_category(1, UserId::new(1), &connection).unwrap();
        assert_eq!(category.category_name, "Groceries");
    }

    #[tokio::test]
    async fn invalid_type_is_a_bad_request() {
        let state = get_test_state();
        let body = CreateCategoryBody {
            category_name: "Groceries".to_owned(),
            category_type: "Transfer".to_owned(),
        };

        let response = create_category_endpoint(State(state), UserId::new(1), AppJson(body))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
