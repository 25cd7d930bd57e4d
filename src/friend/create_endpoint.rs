//! Defines the endpoint for creating a new friend.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::lock_connection,
    extract::Json,
    friend::{FriendBalance, FriendId, FriendState, create_friend},
};

/// The request body for creating or updating a friend.
#[derive(Debug, Serialize, Deserialize)]
pub struct FriendForm {
    /// A client-chosen ID, only used when creating a friend.
    #[serde(default)]
    pub id: Option<FriendId>,
    /// The friend's name.
    pub name: String,
}

/// A route handler for creating a new friend, responds with the friend and
/// their (zero) balances.
pub async fn create_friend_endpoint(
    State(state): State<FriendState>,
    Json(form): Json<FriendForm>,
) -> Result<(StatusCode, Json<FriendBalance>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let friend = create_friend(form.id, &form.name, &connection).inspect_err(|error| {
        tracing::debug!("Could not create friend with {form:?}: {error}");
    })?;

    tracing::info!("Created friend {}", friend.id);

    Ok((
        StatusCode::CREATED,
        Json(FriendBalance::new(friend, 0.0, 0.0)),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        extract::Json,
        friend::{FriendBalance, FriendState, create_friend_endpoint, get_friend},
    };

    use super::FriendForm;

    fn get_test_state() -> FriendState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        FriendState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_friend() {
        let state = get_test_state();
        let form = FriendForm {
            id: None,
            name: "Ana".to_owned(),
        };

        let (status, Json(friend)) = create_friend_endpoint(State(state.clone()), Json(form))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            friend,
            FriendBalance {
                id: 1,
                name: "Ana".to_owned(),
                credit_balance: 0.0,
                debit_balance: 0.0,
            }
        );
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_friend(1, &connection).unwrap().name, "Ana");
    }

    #[tokio::test]
    async fn create_fails_on_existing_id() {
        let state = get_test_state();
        let form = || FriendForm {
            id: Some(7),
            name: "Ana".to_owned(),
        };
        create_friend_endpoint(State(state.clone()), Json(form()))
            .await
            .unwrap();

        let result = create_friend_endpoint(State(state), Json(form())).await;

        assert_eq!(result.err(), Some(Error::DuplicateFriend));
    }
}
