//! Defines the endpoint for renaming a friend.

use axum::{extract::State, http::StatusCode};

use crate::{
    Error,
    db::lock_connection,
    extract::{Json, Path},
    friend::{FriendId, FriendState, core::update_friend_name, create_endpoint::FriendForm},
};

/// A route handler for changing a friend's name.
///
/// Only the name is read from the request body.
pub async fn edit_friend_endpoint(
    State(state): State<FriendState>,
    Path(friend_id): Path<FriendId>,
    Json(form): Json<FriendForm>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_friend_name(friend_id, &form.name, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
