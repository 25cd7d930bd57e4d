//! Defines the endpoint for recording a payment from a friend.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::lock_connection,
    expense::ExpenseId,
    extract::{Path, Query},
    friend::FriendId,
    friend_expense::{FriendExpenseState, add_credit},
};

/// The query parameters for recording a payment.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreditQuery {
    /// The amount to add to what the friend has paid. May be negative.
    pub amount: f64,
}

/// A route handler for adding to what a friend has paid towards an expense.
///
/// The amount is added to the existing credit rather than replacing it.
pub async fn add_credit_endpoint(
    State(state): State<FriendExpenseState>,
    Path((expense_id, friend_id)): Path<(ExpenseId, FriendId)>,
    Query(query): Query<CreditQuery>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    add_credit(expense_id, friend_id, query.amount, &connection)?;
    tracing::info!(
        "Added {} to the credit of friend {friend_id} for expense {expense_id}",
        query.amount
    );

    Ok(StatusCode::NO_CONTENT)
}
