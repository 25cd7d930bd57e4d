//! Application router configuration.

use axum::{
    Router,
    routing::{MethodRouter, get},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_expense_endpoint, get_expenses_endpoint,
    },
    friend::{
        create_friend_endpoint, delete_friend_endpoint, edit_friend_endpoint,
        get_friend_endpoint, get_friend_expenses_endpoint, get_friends_endpoint,
    },
    friend_expense::{
        add_credit_endpoint, assign_friend_endpoint, get_expense_friend_endpoint,
        get_expense_friends_endpoint, unassign_friend_endpoint,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
///
/// Requests from any origin are allowed.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::FRIENDS, friends_route())
        .route(endpoints::FRIENDS_NO_SLASH, friends_route())
        .route(
            endpoints::FRIEND,
            get(get_friend_endpoint)
                .put(edit_friend_endpoint)
                .delete(delete_friend_endpoint),
        )
        .route(
            endpoints::FRIEND_EXPENSES,
            get(get_friend_expenses_endpoint),
        )
        .route(endpoints::EXPENSES, expenses_route())
        .route(endpoints::EXPENSES_NO_SLASH, expenses_route())
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(edit_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE_FRIENDS,
            get(get_expense_friends_endpoint).post(assign_friend_endpoint),
        )
        .route(
            endpoints::EXPENSE_FRIEND,
            get(get_expense_friend_endpoint)
                .put(add_credit_endpoint)
                .delete(unassign_friend_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(cors_layer())
        .with_state(state)
}

fn friends_route() -> MethodRouter<AppState> {
    get(get_friends_endpoint).post(create_friend_endpoint)
}

fn expenses_route() -> MethodRouter<AppState> {
    get(get_expenses_endpoint).post(create_expense_endpoint)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, ErrorDetail, build_router,
        endpoints::{self, format_endpoint},
        expense::ExpenseBalance,
        friend::FriendBalance,
    };

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection).expect("Could not initialize test database");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn split_dinner_with_ana() {
        let server = get_test_server();

        let ana = server
            .post(endpoints::FRIENDS)
            .json(&json!({ "name": "Ana" }))
            .await;
        ana.assert_status(StatusCode::CREATED);
        let ana = ana.json::<FriendBalance>();

        let dinner = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "description": "Dinner", "date": "2024-06-01", "amount": 90 }))
            .await;
        dinner.assert_status(StatusCode::CREATED);
        let dinner = dinner.json::<ExpenseBalance>();

        let expense_friends = format_endpoint(endpoints::EXPENSE_FRIENDS, &[dinner.id]);
        server
            .post(&expense_friends)
            .add_query_param("friend_id", ana.id)
            .await
            .assert_status(StatusCode::CREATED);

        let friends = server.get(&expense_friends).await.json::<Vec<FriendBalance>>();
        assert_eq!(
            friends,
            vec![FriendBalance {
                id: ana.id,
                name: "Ana".to_owned(),
                credit_balance: 0.0,
                debit_balance: 45.0,
            }]
        );

        let expense_friend = format_endpoint(endpoints::EXPENSE_FRIEND, &[dinner.id, ana.id]);
        server
            .put(&expense_friend)
            .add_query_param("amount", 30)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let friends = server.get(&expense_friends).await.json::<Vec<FriendBalance>>();
        assert_eq!(friends[0].credit_balance, 30.0);

        let response = server.delete(&expense_friend).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(
            response.json::<ErrorDetail>().detail,
            format!(
                "Credit balance of friend '{}' in expense '{}' is not zero",
                ana.id, dinner.id
            )
        );
    }

    #[tokio::test]
    async fn collection_routes_work_without_trailing_slash() {
        let server = get_test_server();

        server
            .post(endpoints::FRIENDS_NO_SLASH)
            .json(&json!({ "name": "Ana" }))
            .await
            .assert_status(StatusCode::CREATED);

        let friends = server
            .get(endpoints::FRIENDS_NO_SLASH)
            .await
            .json::<Vec<FriendBalance>>();
        assert_eq!(friends.len(), 1);
        let expenses = server
            .get(endpoints::EXPENSES_NO_SLASH)
            .await
            .json::<Vec<ExpenseBalance>>();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn expense_dates_are_validated_and_serialized_as_text() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "description": "Dinner", "date": "2024/01/01", "amount": 90 }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<ErrorDetail>().detail,
            "Malformed date '2024/01/01' (required format: YYYY-MM-DD)"
        );

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "description": "Dinner", "date": "2024-01-01", "amount": 90 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<serde_json::Value>()["date"], "2024-01-01");
    }

    #[tokio::test]
    async fn duplicate_expense_conflicts() {
        let server = get_test_server();
        let body = json!({ "description": "Dinner", "date": "2024-06-01", "amount": 90 });

        server
            .post(endpoints::EXPENSES)
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);
        let response = server.post(endpoints::EXPENSES).json(&body).await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<ErrorDetail>().detail, "Expense already exists");
    }

    #[tokio::test]
    async fn updates_and_deletes_return_no_content() {
        let server = get_test_server();
        let friend = server
            .post(endpoints::FRIENDS)
            .json(&json!({ "name": "Ana" }))
            .await
            .json::<FriendBalance>();
        let friend_path = format_endpoint(endpoints::FRIEND, &[friend.id]);

        server
            .put(&friend_path)
            .json(&json!({ "name": "Anabel" }))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        assert_eq!(
            server.get(&friend_path).await.json::<FriendBalance>().name,
            "Anabel"
        );

        let response = server.delete(&friend_path).await;
        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.as_bytes().is_empty());
        server
            .get(&friend_path)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_expense_removes_friend_assignments() {
        let server = get_test_server();
        let friend = server
            .post(endpoints::FRIENDS)
            .json(&json!({ "name": "Ana" }))
            .await
            .json::<FriendBalance>();
        let expense = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "description": "Dinner", "date": "2024-06-01", "amount": 90 }))
            .await
            .json::<ExpenseBalance>();
        server
            .post(&format_endpoint(endpoints::EXPENSE_FRIENDS, &[expense.id]))
            .add_query_param("friend_id", friend.id)
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete(&format_endpoint(endpoints::EXPENSE, &[expense.id]))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format_endpoint(
                endpoints::EXPENSE_FRIEND,
                &[expense.id, friend.id],
            ))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        let expenses = server
            .get(&format_endpoint(endpoints::FRIEND_EXPENSES, &[friend.id]))
            .await
            .json::<Vec<serde_json::Value>>();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn malformed_input_returns_json_detail() {
        let server = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE_FRIEND, &[1, 1]))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<ErrorDetail>().detail.contains("amount"));

        let response = server
            .post(&format_endpoint(endpoints::EXPENSE_FRIENDS, &[1]))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<ErrorDetail>().detail.contains("friend_id"));

        let response = server.get("/friends/abc").await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<ErrorDetail>().detail.contains("abc"));

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "description": "Dinner", "date": "2024-06-01" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<ErrorDetail>().detail.contains("amount"));
    }

    #[tokio::test]
    async fn unknown_route_returns_json_404() {
        let server = get_test_server();

        let response = server.get("/nothing/here").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorDetail>().detail, "Not Found");
    }

    #[tokio::test]
    async fn allows_cross_origin_requests() {
        let server = get_test_server();

        let response = server
            .get(endpoints::FRIENDS)
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("http://example.com"),
            )
            .await;

        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("*"))
        );
    }
}
