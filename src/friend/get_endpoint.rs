//! Defines the endpoints for reading friends and their balances.

use axum::extract::State;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    balance::{credit_balance, debit_balance},
    db::lock_connection,
    expense::{ExpenseId, get_expense},
    extract::{Json, Path},
    friend::{
        Friend, FriendBalance, FriendId, FriendState, core::get_all_friends, get_friend,
    },
    friend_expense::{get_expense_share, get_friend_expenses_by_friend},
};

/// An expense as seen by one of the friends sharing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedExpense {
    /// The ID of the expense.
    pub id: ExpenseId,
    pub description: String,
    /// The total cost of the expense.
    pub amount: f64,
    /// The number of people splitting the expense, counting the payer.
    pub num_friends: i64,
    /// How much the friend has paid towards this expense.
    pub credit_balance: f64,
    /// The friend's share of this expense.
    pub debit_balance: f64,
}

/// A route handler for getting a friend with their total balances.
pub async fn get_friend_endpoint(
    State(state): State<FriendState>,
    Path(friend_id): Path<FriendId>,
) -> Result<Json<FriendBalance>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let friend = get_friend(friend_id, &connection)?;

    get_friend_balance(friend, &connection).map(Json)
}

/// A route handler for listing every friend with their total balances.
pub async fn get_friends_endpoint(
    State(state): State<FriendState>,
) -> Result<Json<Vec<FriendBalance>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_friends(&connection)?
        .into_iter()
        .map(|friend| get_friend_balance(friend, &connection))
        .collect::<Result<_, _>>()
        .map(Json)
}

/// A route handler for listing the expenses a friend shares, with the
/// friend's balances for each one.
pub async fn get_friend_expenses_endpoint(
    State(state): State<FriendState>,
    Path(friend_id): Path<FriendId>,
) -> Result<Json<Vec<SharedExpense>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_shared_expenses(friend_id, &connection).map(Json)
}

/// Add up what `friend` has paid and owes across all of their expenses.
fn get_friend_balance(friend: Friend, connection: &Connection) -> Result<FriendBalance, Error> {
    let links = get_friend_expenses_by_friend(friend.id, connection)?;

    let shares = links
        .iter()
        .map(|link| {
            let expense = get_expense(link.expense_id, connection)?;
            get_expense_share(&expense, connection)
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let credit = credit_balance(links.iter().map(|link| link.amount));
    let debit = debit_balance(shares);

    Ok(FriendBalance::new(friend, credit, debit))
}

fn get_shared_expenses(
    friend_id: FriendId,
    connection: &Connection,
) -> Result<Vec<SharedExpense>, Error> {
    get_friend(friend_id, connection)?;

    get_friend_expenses_by_friend(friend_id, connection)?
        .into_iter()
        .map(|link| {
            let expense = get_expense(link.expense_id, connection)?;
            let share = get_expense_share(&expense, connection)?;

            Ok(SharedExpense {
                id: expense.id,
                description: expense.description,
                amount: expense.amount,
                num_friends: share.num_friends(),
                credit_balance: link.amount,
                debit_balance: share.per_friend(),
            })
        })
        .collect()
}
