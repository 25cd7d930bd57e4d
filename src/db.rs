//! Database setup, connection locking and sample data.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use time::{Date, macros::date};

use crate::{
    Error,
    expense::{NewExpense, create_expense, create_expense_table},
    friend::{count_friends, create_friend, create_friend_table},
    friend_expense::{create_friend_expense, create_friend_expense_table},
};

/// Enable foreign keys and create the tables for the domain models.
///
/// This function is safe to call on a database that has already been
/// initialized.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign keys are disabled in SQLite by default, and the pragma is a no-op
    // inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_friend_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_friend_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub fn lock_connection(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

const SAMPLE_EXPENSES: [(&str, Date, f64); 5] = [
    ("Sevilla", date!(2024 - 10 - 03), 420.0),
    ("Granada", date!(2024 - 10 - 19), 85.0),
    ("Bilbao", date!(2024 - 11 - 08), 610.0),
    ("Valencia", date!(2024 - 12 - 14), 230.0),
    ("Santiago", date!(2025 - 01 - 25), 975.0),
];
const SAMPLE_NAMES: [&str; 10] = [
    "Lucía", "Hugo", "Martina", "Mateo", "Paula", "Leo", "Daniela", "Pablo", "Carmen", "Álvaro",
];

/// Populate the database with sample friends and expenses if there are no
/// friends yet.
///
/// Each friend is assigned to a few of the expenses with nothing paid.
/// Returns whether any data was added.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn seed_if_empty(connection: &Connection) -> Result<bool, Error> {
    if count_friends(connection)? > 0 {
        tracing::info!("Database not empty, skipping sample data");
        return Ok(false);
    }

    let mut expense_ids = Vec::with_capacity(SAMPLE_EXPENSES.len());

    for (city, date, amount) in SAMPLE_EXPENSES {
        let expense = create_expense(
            &NewExpense {
                id: None,
                description: format!("Travel to {city}"),
                date,
                amount,
            },
            connection,
        )?;
        expense_ids.push(expense.id);
    }

    for (i, name) in SAMPLE_NAMES.iter().enumerate() {
        let friend = create_friend(None, name, connection)?;

        for (j, expense_id) in expense_ids.iter().enumerate() {
            if (i + j) % 3 == 0 {
                create_friend_expense(*expense_id, friend.id, connection)?;
            }
        }
    }

    tracing::info!(
        "Added {} sample friends and {} sample expenses",
        SAMPLE_NAMES.len(),
        expense_ids.len()
    );

    Ok(true)
}
