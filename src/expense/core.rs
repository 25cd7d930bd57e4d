use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{AppState, Error, database_id::DatabaseId};

pub type ExpenseId = DatabaseId;

/// Something that was paid for and is split with friends.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The id for the expense.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// When the expense happened.
    pub date: Date,
    /// The total cost.
    pub amount: f64,
}

/// The data for an expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A client-chosen ID, the database generates one if `None`.
    pub id: Option<ExpenseId>,
    pub description: String,
    pub date: Date,
    pub amount: f64,
}

/// An expense along with how much of it has been paid back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBalance {
    pub id: ExpenseId,
    pub description: String,
    pub date: Date,
    pub amount: f64,
    /// The total paid by all friends sharing the expense.
    pub credit_balance: f64,
    /// The number of people splitting the expense, counting the payer.
    pub num_friends: i64,
}

impl ExpenseBalance {
    pub fn new(expense: Expense, credit_balance: f64, num_friends: i64) -> Self {
        Self {
            id: expense.id,
            description: expense.description,
            date: expense.date,
            amount: expense.amount,
            credit_balance,
            num_friends,
        }
    }
}

/// The state needed by the expense endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Parse a date in the format `YYYY-MM-DD`.
///
/// # Errors
/// Returns [Error::InvalidDate] with the original text if it is not a valid
/// calendar date in that format.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            amount REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_description_date ON expense(description, date);",
    )?;

    Ok(())
}

pub fn map_row_to_expense(row: &rusqlite::Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let date = row.get(2)?;
    let amount = row.get(3)?;

    Ok(Expense {
        id,
        description,
        date,
        amount,
    })
}

/// Create an expense and return it with its ID.
///
/// # Errors
/// Returns [Error::DuplicateExpense] if an expense with the same description
/// and date, or the same ID, already exists.
pub fn create_expense(expense: &NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let transaction = connection.unchecked_transaction()?;

    let already_exists: bool = transaction.query_row(
        "SELECT EXISTS(SELECT 1 FROM expense WHERE description = ?1 AND date = ?2)",
        params![expense.description, expense.date],
        |row| row.get(0),
    )?;

    if already_exists {
        return Err(Error::DuplicateExpense);
    }

    transaction
        .execute(
            "INSERT INTO expense (id, description, date, amount) VALUES (?1, ?2, ?3, ?4)",
            params![expense.id, expense.description, expense.date, expense.amount],
        )
        .map_err(|error| match error {
            // Code 1555 occurs when a PRIMARY KEY constraint failed.
            rusqlite::Error::SqliteFailure(error, _) if error.extended_code == 1555 => {
                Error::DuplicateExpense
            }
            error => error.into(),
        })?;

    let id = transaction.last_insert_rowid();
    transaction.commit()?;

    Ok(Expense {
        id,
        description: expense.description.clone(),
        date: expense.date,
        amount: expense.amount,
    })
}

/// Retrieve a single expense by ID.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .query_row(
            "SELECT id, description, date, amount FROM expense WHERE id = :id",
            &[(":id", &id)],
            map_row_to_expense,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::ExpenseNotFound(id),
            error => error.into(),
        })
}

/// Retrieve all expenses ordered by ID.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare("SELECT id, description, date, amount FROM expense ORDER BY id ASC")?
        .query_map([], map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Replace the description, date and amount of an expense.
pub fn update_expense(
    id: ExpenseId,
    description: &str,
    date: Date,
    amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense
        SET \
            description = ?1, \
            date = ?2, \
            amount = ?3 \
        WHERE id = ?4",
        params![description, date, amount, id],
    )?;

    if rows_affected == 0 {
        return Err(Error::ExpenseNotFound(id));
    }

    Ok(())
}

/// Delete an expense and everyone's payments towards it.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::ExpenseNotFound(id));
    }

    Ok(())
}
