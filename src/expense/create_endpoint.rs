//! Defines the endpoint for creating a new expense.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    balance::num_friends,
    db::lock_connection,
    expense::{ExpenseBalance, ExpenseId, ExpenseState, NewExpense, create_expense, parse_date},
    extract::Json,
};

/// The request body for creating or updating an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// A client-chosen ID, only used when creating an expense.
    #[serde(default)]
    pub id: Option<ExpenseId>,
    pub description: String,
    /// The date of the expense in the format `YYYY-MM-DD`.
    pub date: String,
    pub amount: f64,
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date(&form.date)?,
            id: form.id,
            description: form.description,
            amount: form.amount,
        })
    }
}

/// A route handler for creating a new expense, responds with the expense.
///
/// A new expense has not been split with anyone yet, so the response has no
/// credit and the payer is the only one sharing it.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Json(form): Json<ExpenseForm>,
) -> Result<(StatusCode, Json<ExpenseBalance>), Error> {
    let new_expense = NewExpense::try_from(form)?;

    let connection = lock_connection(&state.db_connection)?;

    let expense = create_expense(&new_expense, &connection).inspect_err(|error| {
        tracing::debug!("Could not create expense with {new_expense:?}: {error}");
    })?;

    tracing::info!("Created expense {}", expense.id);

    Ok((
        StatusCode::CREATED,
        Json(ExpenseBalance::new(expense, 0.0, num_friends(0))),
    ))
}
