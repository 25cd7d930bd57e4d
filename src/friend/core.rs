use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    balance::credit_balance,
    database_id::DatabaseId,
    friend_expense::get_friend_expenses_by_friend,
};

pub type FriendId = DatabaseId;

/// A person that expenses can be split with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    /// The id for the friend.
    pub id: FriendId,
    /// The friend's name.
    pub name: String,
}

/// A friend along with how much they have paid and how much they owe.
///
/// Depending on where it comes from, the balances cover either all of the
/// friend's expenses or a single expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendBalance {
    pub id: FriendId,
    pub name: String,
    /// The amount paid so far.
    pub credit_balance: f64,
    /// The friend's share of the expense cost.
    pub debit_balance: f64,
}

impl FriendBalance {
    pub fn new(friend: Friend, credit_balance: f64, debit_balance: f64) -> Self {
        Self {
            id: friend.id,
            name: friend.name,
            credit_balance,
            debit_balance,
        }
    }
}

/// The state needed by the friend endpoints.
#[derive(Debug, Clone)]
pub struct FriendState {
    /// The database connection for managing friends.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FriendState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_friend_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS friend (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_friend(row: &rusqlite::Row) -> Result<Friend, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;

    Ok(Friend { id, name })
}

/// Create a friend and return it with its ID.
///
/// If `id` is `None` the database generates one.
///
/// # Errors
/// Returns [Error::DuplicateFriend] if a friend with `id` already exists.
pub fn create_friend(
    id: Option<FriendId>,
    name: &str,
    connection: &Connection,
) -> Result<Friend, Error> {
    connection
        .execute(
            "INSERT INTO friend (id, name) VALUES (?1, ?2)",
            params![id, name],
        )
        .map_err(|error| match error {
            // Code 1555 occurs when a PRIMARY KEY constraint failed.
            rusqlite::Error::SqliteFailure(error, _) if error.extended_code == 1555 => {
                Error::DuplicateFriend
            }
            error => error.into(),
        })?;

    Ok(Friend {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
    })
}

/// Retrieve a single friend by ID.
pub fn get_friend(id: FriendId, connection: &Connection) -> Result<Friend, Error> {
    connection
        .query_row(
            "SELECT id, name FROM friend WHERE id = :id",
            &[(":id", &id)],
            map_row_to_friend,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::FriendNotFound(id),
            error => error.into(),
        })
}

/// Retrieve all friends ordered by ID.
pub fn get_all_friends(connection: &Connection) -> Result<Vec<Friend>, Error> {
    connection
        .prepare("SELECT id, name FROM friend ORDER BY id ASC")?
        .query_map([], map_row_to_friend)?
        .map(|maybe_friend| maybe_friend.map_err(Error::from))
        .collect()
}

pub fn count_friends(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("SELECT COUNT(*) FROM friend", [], |row| row.get(0))
        .map_err(Error::from)
}

/// Change a friend's name.
pub fn update_friend_name(id: FriendId, name: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("UPDATE friend SET name = ?1 WHERE id = ?2", params![name, id])?;

    if rows_affected == 0 {
        return Err(Error::FriendNotFound(id));
    }

    Ok(())
}

/// Delete a friend and remove them from all of their expenses.
///
/// # Errors
/// Returns [Error::FriendCreditNotZero] if the friend has paid anything
/// towards their expenses, or [Error::FriendNotFound] if there is no such
/// friend.
pub fn delete_friend(id: FriendId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    get_friend(id, &transaction)?;

    let links = get_friend_expenses_by_friend(id, &transaction)?;
    if credit_balance(links.iter().map(|link| link.amount)) != 0.0 {
        return Err(Error::FriendCreditNotZero(id));
    }

    transaction.execute("DELETE FROM friend WHERE id = ?1", [id])?;
    transaction.commit()?;

    Ok(())
}
