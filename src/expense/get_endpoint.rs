//! Defines the endpoints for reading expenses and how much has been paid back.

use axum::extract::State;
use rusqlite::Connection;

use crate::{
    Error,
    balance::{credit_balance, num_friends},
    db::lock_connection,
    expense::{Expense, ExpenseBalance, ExpenseId, ExpenseState, get_all_expenses, get_expense},
    extract::{Json, Path},
    friend_expense::get_friend_expenses_by_expense,
};

/// A route handler for getting an expense with its credit balance and the
/// number of people sharing it.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<ExpenseBalance>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let expense = get_expense(expense_id, &connection)?;

    get_expense_balance(expense, &connection).map(Json)
}

/// A route handler for listing every expense with its credit balance and the
/// number of people sharing it.
pub async fn get_expenses_endpoint(
    State(state): State<ExpenseState>,
) -> Result<Json<Vec<ExpenseBalance>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_expenses(&connection)?
        .into_iter()
        .map(|expense| get_expense_balance(expense, &connection))
        .collect::<Result<_, _>>()
        .map(Json)
}

fn get_expense_balance(expense: Expense, connection: &Connection) -> Result<ExpenseBalance, Error> {
    let links = get_friend_expenses_by_expense(expense.id, connection)?;

    let credit = credit_balance(links.iter().map(|link| link.amount));

    Ok(ExpenseBalance::new(
        expense,
        credit,
        num_friends(links.len() as i64),
    ))
}
