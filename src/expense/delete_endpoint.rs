//! Defines the endpoint for deleting an expense.

use axum::{extract::State, http::StatusCode};

use crate::{
    Error,
    db::lock_connection,
    expense::{ExpenseId, ExpenseState, core::delete_expense},
    extract::Path,
};

/// A route handler for deleting an expense.
///
/// Unlike friends, expenses can be deleted while friends still have credit on
/// them. Those friends are removed from the expense.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_expense(expense_id, &connection)?;
    tracing::info!("Deleted expense {expense_id}");

    Ok(StatusCode::NO_CONTENT)
}
