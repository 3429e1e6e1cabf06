//! Application router configuration.

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    account::{create_account_endpoint, list_accounts_endpoint},
    category::create_category_endpoint,
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::ACCOUNTS,
            post(create_account_endpoint).get(list_accounts_endpoint),
        )
        .route(endpoints::CATEGORIES, post(create_category_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .with_state(state)
}

/// Report that the API is up.
async fn get_health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Finance Dashboard API is running",
    }))
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints, user::USER_ID_HEADER};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(conn).expect("Could not initialize app state.");

        TestServer::new(build_router(state))
    }

    async fn create_test_account(server: &TestServer, user_id: &str, name: &str) -> i64 {
        let response = server
            .post(endpoints::ACCOUNTS)
            .add_header(USER_ID_HEADER, user_id)
            .json(&json!({
                "account_name": name,
                "account_type": "Checking",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    async fn account_balance(server: &TestServer, user_id: &str, account_id: i64) -> f64 {
        let accounts = server
            .get(endpoints::ACCOUNTS)
            .add_header(USER_ID_HEADER, user_id)
            .await
            .json::<Value>();

        accounts
            .as_array()
            .unwrap()
            .iter()
            .find(|account| account["id"].as_i64() == Some(account_id))
            .expect("account not in list response")["balance"]
            .as_f64()
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_is_up() {
        let server = get_test_server();

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "ok");
    }

    #[tokio::test]
    async fn requests_without_identity_are_unauthorized() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn incomplete_body_is_a_bad_request() {
        let server = get_test_server();
        let account_id = create_test_account(&server, "1", "Everyday").await;

        // Required fields (amount, transaction_type, ...) are missing.
        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, "1")
            .json(&json!({"account_id": account_id}))
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn non_json_update_body_is_a_bad_request() {
        let server = get_test_server();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, 1))
            .add_header(USER_ID_HEADER, "1")
            .text("not json")
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn create_transaction_adjusts_the_balance() {
        let server = get_test_server();
        let account_id = create_test_account(&server, "1", "Everyday").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, "1")
            .json(&json!({
                "account_id": account_id,
                "transaction_date": "2025-06-01",
                "description": "pay day",
                "amount": 100.0,
                "transaction_type": "Income",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let details = response.json::<Value>();
        assert_eq!(details["account_name"], "Everyday");
        assert_eq!(details["amount"], 100.0);
        assert_eq!(account_balance(&server, "1", account_id).await, 100.0);
    }

    #[tokio::test]
    async fn update_reassigning_account_moves_the_contribution() {
        let server = get_test_server();
        let account_a = create_test_account(&server, "1", "Account A").await;
        let account_b = create_test_account(&server, "1", "Account B").await;

        let transaction_id = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, "1")
            .json(&json!({
                "account_id": account_a,
                "transaction_date": "2025-06-01",
                "amount": 50.0,
                "transaction_type": "Expense",
            }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .add_header(USER_ID_HEADER, "1")
            .json(&json!({"account_id": account_b}))
            .await;

        response.assert_status_ok();
        assert_eq!(account_balance(&server, "1", account_a).await, 0.0);
        assert_eq!(account_balance(&server, "1", account_b).await, -50.0);
    }

    #[tokio::test]
    async fn delete_acknowledges_and_restores_the_balance() {
        let server = get_test_server();
        let account_id = create_test_account(&server, "1", "Everyday").await;
        let transaction_id = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, "1")
            .json(&json!({
                "account_id": account_id,
                "transaction_date": "2025-06-01",
                "amount": 100.0,
                "transaction_type": "Income",
            }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let response = server
            .delete(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction_id,
            ))
            .add_header(USER_ID_HEADER, "1")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["message"],
            "Transaction deleted successfully"
        );
        assert_eq!(account_balance(&server, "1", account_id).await, 0.0);
    }

    #[tokio::test]
    async fn other_users_transactions_are_not_found() {
        let server = get_test_server();
        let account_id = create_test_account(&server, "1", "Everyday").await;
        let transaction_id = server
            .post(endpoints::TRANSACTIONS)
            .add_header(USER_ID_HEADER, "1")
            .json(&json!({
                "account_id": account_id,
                "transaction_date": "2025-06-01",
                "amount": 100.0,
                "transaction_type": "Income",
            }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let endpoint = endpoints::format_endpoint(endpoints::TRANSACTION, transaction_id);

        let get_response = server
            .get(&endpoint)
            .add_header(USER_ID_HEADER, "2")
            .await;
        let delete_response = server
            .delete(&endpoint)
            .add_header(USER_ID_HEADER, "2")
            .await;

        get_response.assert_status_not_found();
        delete_response.assert_status_not_found();
        // The delete attempt must not have touched the owner's balance.
        assert_eq!(account_balance(&server, "1", account_id).await, 100.0);
    }
}
