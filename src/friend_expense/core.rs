use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    balance::ExpenseShare,
    expense::{Expense, ExpenseId, get_expense},
    friend::{FriendId, get_friend},
};

/// How much a friend has paid towards an expense they were assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendExpense {
    pub friend_id: FriendId,
    pub expense_id: ExpenseId,
    /// The total paid so far.
    pub amount: f64,
}

/// The state needed by the endpoints for friends on an expense.
#[derive(Debug, Clone)]
pub struct FriendExpenseState {
    /// The database connection for managing friends on expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FriendExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create the table linking friends to expenses.
///
/// Must be created after the friend and expense tables. Rows are deleted
/// along with their friend or expense.
pub fn create_friend_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS friend_expense (
            friend_id INTEGER NOT NULL,
            expense_id INTEGER NOT NULL,
            amount REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (friend_id, expense_id),
            FOREIGN KEY(friend_id) REFERENCES friend(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(expense_id) REFERENCES expense(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_friend_expense_expense_id ON friend_expense(expense_id);",
    )?;

    Ok(())
}

pub fn map_row_to_friend_expense(row: &rusqlite::Row) -> Result<FriendExpense, rusqlite::Error> {
    let friend_id = row.get(0)?;
    let expense_id = row.get(1)?;
    let amount = row.get(2)?;

    Ok(FriendExpense {
        friend_id,
        expense_id,
        amount,
    })
}

/// Assign a friend to an expense with nothing paid.
///
/// # Errors
/// Returns [Error::FriendNotFound] or [Error::ExpenseNotFound] if either does
/// not exist (the friend is checked first), or
/// [Error::DuplicateFriendExpense] if the friend is already assigned.
pub fn create_friend_expense(
    expense_id: ExpenseId,
    friend_id: FriendId,
    connection: &Connection,
) -> Result<FriendExpense, Error> {
    let transaction = connection.unchecked_transaction()?;

    get_friend(friend_id, &transaction)?;
    get_expense(expense_id, &transaction)?;

    transaction
        .execute(
            "INSERT INTO friend_expense (friend_id, expense_id) VALUES (?1, ?2)",
            params![friend_id, expense_id],
        )
        .map_err(|error| match error {
            // Code 1555 occurs when a PRIMARY KEY constraint failed, 2067 for UNIQUE.
            rusqlite::Error::SqliteFailure(error, _)
                if error.extended_code == 1555 || error.extended_code == 2067 =>
            {
                Error::DuplicateFriendExpense
            }
            error => error.into(),
        })?;

    transaction.commit()?;

    Ok(FriendExpense {
        friend_id,
        expense_id,
        amount: 0.0,
    })
}

/// Retrieve what a friend has paid towards an expense.
///
/// # Errors
/// Returns [Error::FriendExpenseNotFound] if the friend is not assigned to the
/// expense.
pub fn get_friend_expense(
    expense_id: ExpenseId,
    friend_id: FriendId,
    connection: &Connection,
) -> Result<FriendExpense, Error> {
    connection
        .query_row(
            "SELECT friend_id, expense_id, amount FROM friend_expense \
            WHERE expense_id = ?1 AND friend_id = ?2",
            params![expense_id, friend_id],
            map_row_to_friend_expense,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::FriendExpenseNotFound {
                expense_id,
                friend_id,
            },
            error => error.into(),
        })
}

/// Retrieve every expense assignment for a friend, ordered by expense ID.
pub fn get_friend_expenses_by_friend(
    friend_id: FriendId,
    connection: &Connection,
) -> Result<Vec<FriendExpense>, Error> {
    connection
        .prepare(
            "SELECT friend_id, expense_id, amount FROM friend_expense \
            WHERE friend_id = :friend_id ORDER BY expense_id ASC",
        )?
        .query_map(&[(":friend_id", &friend_id)], map_row_to_friend_expense)?
        .map(|maybe_link| maybe_link.map_err(Error::from))
        .collect()
}

/// Retrieve every friend assignment for an expense, ordered by friend ID.
pub fn get_friend_expenses_by_expense(
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Vec<FriendExpense>, Error> {
    connection
        .prepare(
            "SELECT friend_id, expense_id, amount FROM friend_expense \
            WHERE expense_id = :expense_id ORDER BY friend_id ASC",
        )?
        .query_map(&[(":expense_id", &expense_id)], map_row_to_friend_expense)?
        .map(|maybe_link| maybe_link.map_err(Error::from))
        .collect()
}

/// Get how `expense` is split between its friends.
pub fn get_expense_share(expense: &Expense, connection: &Connection) -> Result<ExpenseShare, Error> {
    let linked_friends = connection.query_row(
        "SELECT COUNT(*) FROM friend_expense WHERE expense_id = ?1",
        [expense.id],
        |row| row.get(0),
    )?;

    Ok(ExpenseShare {
        expense_amount: expense.amount,
        linked_friends,
    })
}

/// Add `amount` to what a friend has paid towards an expense.
///
/// # Errors
/// Returns [Error::FriendExpenseNotFound] if the friend is not assigned to the
/// expense.
pub fn add_credit(
    expense_id: ExpenseId,
    friend_id: FriendId,
    amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE friend_expense SET amount = amount + ?1 WHERE expense_id = ?2 AND friend_id = ?3",
        params![amount, expense_id, friend_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::FriendExpenseNotFound {
            expense_id,
            friend_id,
        });
    }

    Ok(())
}

/// Remove a friend from an expense.
///
/// # Errors
/// Returns [Error::FriendExpenseCreditNotZero] if the friend has paid anything
/// towards the expense, or [Error::FriendExpenseNotFound] if the friend is not
/// assigned to it.
pub fn delete_friend_expense(
    expense_id: ExpenseId,
    friend_id: FriendId,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let link = get_friend_expense(expense_id, friend_id, &transaction)?;
    if link.amount != 0.0 {
        return Err(Error::FriendExpenseCreditNotZero {
            expense_id,
            friend_id,
        });
    }

    transaction.execute(
        "DELETE FROM friend_expense WHERE expense_id = ?1 AND friend_id = ?2",
        params![expense_id, friend_id],
    )?;
    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod friend_expense_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        balance::ExpenseShare,
        expense::{Expense, NewExpense, create_expense},
        friend::{Friend, create_friend},
        initialize_db,
    };

    use super::{
        FriendExpense, add_credit, create_friend_expense, delete_friend_expense,
        get_expense_share, get_friend_expense, get_friend_expenses_by_expense,
        get_friend_expenses_by_friend,
    };

    fn get_test_connection() -> (Connection, Friend, Expense) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let friend = create_friend(None, "Ana", &connection).unwrap();
        let expense = create_expense(
            &NewExpense {
                id: None,
                description: "Dinner".to_owned(),
                date: date!(2024 - 06 - 01),
                amount: 90.0,
            },
            &connection,
        )
        .unwrap();

        (connection, friend, expense)
    }

    #[test]
    fn create_starts_with_nothing_paid() {
        let (connection, friend, expense) = get_test_connection();

        let link = create_friend_expense(expense.id, friend.id, &connection).unwrap();

        let want = FriendExpense {
            friend_id: friend.id,
            expense_id: expense.id,
            amount: 0.0,
        };
        assert_eq!(link, want);
        assert_eq!(get_friend_expense(expense.id, friend.id, &connection), Ok(want));
    }

    #[test]
    fn create_fails_on_duplicate() {
        let (connection, friend, expense) = get_test_connection();
        create_friend_expense(expense.id, friend.id, &connection).unwrap();

        let result = create_friend_expense(expense.id, friend.id, &connection);

        assert_eq!(result, Err(Error::DuplicateFriendExpense));
    }

    #[test]
    fn create_checks_friend_before_expense() {
        let (connection, _, _) = get_test_connection();

        let result = create_friend_expense(100, 200, &connection);

        assert_eq!(result, Err(Error::FriendNotFound(200)));
    }

    #[test]
    fn create_fails_on_missing_expense() {
        let (connection, friend, _) = get_test_connection();

        let result = create_friend_expense(100, friend.id, &connection);

        assert_eq!(result, Err(Error::ExpenseNotFound(100)));
    }

    #[test]
    fn credit_is_added_to_amount_paid() {
        let (connection, friend, expense) = get_test_connection();
        create_friend_expense(expense.id, friend.id, &connection).unwrap();

        add_credit(expense.id, friend.id, 10.0, &connection).unwrap();
        add_credit(expense.id, friend.id, 5.0, &connection).unwrap();

        let link = get_friend_expense(expense.id, friend.id, &connection).unwrap();
        assert_eq!(link.amount, 15.0);
    }

    #[test]
    fn negative_credit_reduces_amount_paid() {
        let (connection, friend, expense) = get_test_connection();
        create_friend_expense(expense.id, friend.id, &connection).unwrap();

        add_credit(expense.id, friend.id, 10.0, &connection).unwrap();
        add_credit(expense.id, friend.id, -10.0, &connection).unwrap();

        let link = get_friend_expense(expense.id, friend.id, &connection).unwrap();
        assert_eq!(link.amount, 0.0);
    }

    #[test]
    fn credit_fails_on_missing_link() {
        let (connection, friend, expense) = get_test_connection();

        let result = add_credit(expense.id, friend.id, 10.0, &connection);

        assert_eq!(
            result,
            Err(Error::FriendExpenseNotFound {
                expense_id: expense.id,
                friend_id: friend.id
            })
        );
    }

    #[test]
    fn lookups_by_friend_and_expense_agree() {
        let (connection, ana, dinner) = get_test_connection();
        let bea = create_friend(None, "Bea", &connection).unwrap();
        let taxi = create_expense(
            &NewExpense {
                id: None,
                description: "Taxi".to_owned(),
                date: date!(2024 - 06 - 01),
                amount: 20.0,
            },
            &connection,
        )
        .unwrap();
        create_friend_expense(dinner.id, ana.id, &connection).unwrap();
        create_friend_expense(dinner.id, bea.id, &connection).unwrap();
        create_friend_expense(taxi.id, ana.id, &connection).unwrap();

        let by_friend = get_friend_expenses_by_friend(ana.id, &connection).unwrap();
        let by_expense = get_friend_expenses_by_expense(dinner.id, &connection).unwrap();

        assert_eq!(
            by_friend
                .iter()
                .map(|link| link.expense_id)
                .collect::<Vec<_>>(),
            vec![dinner.id, taxi.id]
        );
        assert_eq!(
            by_expense
                .iter()
                .map(|link| link.friend_id)
                .collect::<Vec<_>>(),
            vec![ana.id, bea.id]
        );
    }

    #[test]
    fn expense_share_counts_linked_friends() {
        let (connection, friend, expense) = get_test_connection();
        create_friend_expense(expense.id, friend.id, &connection).unwrap();

        let share = get_expense_share(&expense, &connection).unwrap();

        assert_eq!(
            share,
            ExpenseShare {
                expense_amount: 90.0,
                linked_friends: 1
            }
        );
        assert_eq!(share.per_friend(), 45.0);
    }

    #[test]
    fn delete_removes_link_without_credit() {
        let (connection, friend, expense) = get_test_connection();
        create_friend_expense(expense.id, friend.id, &connection).unwrap();

        delete_friend_expense(expense.id, friend.id, &connection).unwrap();

        assert_eq!(
            get_friend_expenses_by_expense(expense.id, &connection),
            Ok(vec![])
        );
    }

    #[test]
    fn delete_fails_with_credit() {
        let (connection, friend, expense) = get_test_connection();
        create_friend_expense(expense.id, friend.id, &connection).unwrap();
        add_credit(expense.id, friend.id, 0.5, &connection).unwrap();

        let result = delete_friend_expense(expense.id, friend.id, &connection);

        assert_eq!(
            result,
            Err(Error::FriendExpenseCreditNotZero {
                expense_id: expense.id,
                friend_id: friend.id
            })
        );
        assert!(get_friend_expense(expense.id, friend.id, &connection).is_ok());
    }

    #[test]
    fn delete_fails_on_missing_link() {
        let (connection, friend, expense) = get_test_connection();

        let result = delete_friend_expense(expense.id, friend.id, &connection);

        assert_eq!(
            result,
            Err(Error::FriendExpenseNotFound {
                expense_id: expense.id,
                friend_id: friend.id
            })
        );
    }
}
