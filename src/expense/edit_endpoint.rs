//! Defines the endpoint for updating an expense.

use axum::{extract::State, http::StatusCode};

use crate::{
    Error,
    db::lock_connection,
    expense::{
        ExpenseId, ExpenseState, core::update_expense, create_endpoint::ExpenseForm, parse_date,
    },
    extract::{Json, Path},
};

/// A route handler for replacing the description, date and amount of an
/// expense.
///
/// The date is validated before checking that the expense exists.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Json(form): Json<ExpenseForm>,
) -> Result<StatusCode, Error> {
    let date = parse_date(&form.date)?;

    let connection = lock_connection(&state.db_connection)?;

    update_expense(
        expense_id,
        &form.description,
        date,
        form.amount,
        &connection,
    )?;

    Ok(StatusCode::NO_CONTENT)
}
