//! Defines the endpoint for removing a friend from an expense.

use axum::{extract::State, http::StatusCode};

use crate::{
    Error,
    db::lock_connection,
    expense::ExpenseId,
    extract::Path,
    friend::FriendId,
    friend_expense::{FriendExpenseState, core::delete_friend_expense},
};

/// A route handler for removing a friend from an expense.
///
/// Friends that have paid towards the expense cannot be removed.
pub async fn unassign_friend_endpoint(
    State(state): State<FriendExpenseState>,
    Path((expense_id, friend_id)): Path<(ExpenseId, FriendId)>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_friend_expense(expense_id, friend_id, &connection)?;
    tracing::info!("Removed friend {friend_id} from expense {expense_id}");

    Ok(StatusCode::NO_CONTENT)
}
