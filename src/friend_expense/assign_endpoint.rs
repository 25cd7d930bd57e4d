//! Defines the endpoint for assigning a friend to an expense.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::lock_connection,
    expense::ExpenseId,
    extract::{Json, Path, Query},
    friend::FriendId,
    friend_expense::{FriendExpense, FriendExpenseState, create_friend_expense},
};

/// The query parameters for assigning a friend to an expense.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssignFriendQuery {
    /// The friend to assign.
    pub friend_id: FriendId,
}

/// A route handler for assigning a friend to an expense, responds with the
/// new assignment.
pub async fn assign_friend_endpoint(
    State(state): State<FriendExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Query(query): Query<AssignFriendQuery>,
) -> Result<(StatusCode, Json<FriendExpense>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let link = create_friend_expense(expense_id, query.friend_id, &connection)?;
    tracing::info!("Assigned friend {} to expense {expense_id}", query.friend_id);

    Ok((StatusCode::CREATED, Json(link)))
}
