//! Defines the endpoint for deleting a friend.

use axum::{extract::State, http::StatusCode};

use crate::{
    Error,
    db::lock_connection,
    extract::Path,
    friend::{FriendId, FriendState, core::delete_friend},
};

/// A route handler for deleting a friend along with their expense assignments.
///
/// Friends that have paid towards any expense cannot be deleted.
pub async fn delete_friend_endpoint(
    State(state): State<FriendState>,
    Path(friend_id): Path<FriendId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_friend(friend_id, &connection)?;
    tracing::info!("Deleted friend {friend_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        extract::Path,
        friend::{FriendState, create_friend, get_friend},
    };

    use super::delete_friend_endpoint;

    #[tokio::test]
    async fn deletes_friend_without_credit() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let friend = create_friend(None, "Ana", &conn).unwrap();
        let state = FriendState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let status = delete_friend_endpoint(State(state.clone()), Path(friend.id))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(
            get_friend(friend.id, &state.db_connection.lock().unwrap()),
            Err(Error::FriendNotFound(friend.id))
        );
    }
}
