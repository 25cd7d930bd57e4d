//! Defines the endpoints for reading friends' balances on an expense.

use axum::extract::State;

use crate::{
    Error,
    db::lock_connection,
    expense::{ExpenseId, get_expense},
    extract::{Json, Path},
    friend::{FriendBalance, FriendId, get_friend},
    friend_expense::{
        FriendExpenseState, get_expense_share, get_friend_expense, get_friend_expenses_by_expense,
    },
};

/// A route handler for listing the friends assigned to an expense.
///
/// Each friend's credit balance is what they have paid towards this expense,
/// and the debit balance is their share of it, which is the same for everyone.
pub async fn get_expense_friends_endpoint(
    State(state): State<FriendExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Vec<FriendBalance>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let expense = get_expense(expense_id, &connection)?;
    let debit = get_expense_share(&expense, &connection)?.per_friend();

    get_friend_expenses_by_expense(expense_id, &connection)?
        .into_iter()
        .map(|link| {
            let friend = get_friend(link.friend_id, &connection)?;
            Ok(FriendBalance::new(friend, link.amount, debit))
        })
        .collect::<Result<_, _>>()
        .map(Json)
}

/// A route handler for getting a single friend's balances on an expense.
pub async fn get_expense_friend_endpoint(
    State(state): State<FriendExpenseState>,
    Path((expense_id, friend_id)): Path<(ExpenseId, FriendId)>,
) -> Result<Json<FriendBalance>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let link = get_friend_expense(expense_id, friend_id, &connection)?;
    let expense = get_expense(expense_id, &connection)?;
    let share = get_expense_share(&expense, &connection)?;
    let friend = get_friend(friend_id, &connection)?;

    Ok(Json(FriendBalance::new(
        friend,
        link.amount,
        share.per_friend(),
    )))
}
