//! SplitWithMe is a small REST API for splitting expenses with friends.
//!
//! Record an expense, assign the friends that share it, and record what each
//! friend pays back. Credit (what has been paid) and debit (what is owed)
//! balances are computed from the stored payments on every read.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod balance;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod extract;
mod friend;
mod friend_expense;
mod logging;
mod not_found;
mod routing;

pub use app_state::AppState;
pub use db::{initialize as initialize_db, seed_if_empty};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{expense::ExpenseId, friend::FriendId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// The display text of each variant is sent to the client as the `detail`
/// field of the error response, except for the internal errors which are only
/// logged.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No friend exists with the given ID.
    #[error("Friend '{0}' not found")]
    FriendNotFound(FriendId),

    /// No expense exists with the given ID.
    #[error("Expense '{0}' not found")]
    ExpenseNotFound(ExpenseId),

    /// The friend has not been assigned to the expense.
    #[error("Expense '{expense_id}' for friend '{friend_id}' not found")]
    FriendExpenseNotFound {
        /// The expense that was looked up.
        expense_id: ExpenseId,
        /// The friend that was looked up.
        friend_id: FriendId,
    },

    /// A friend with the client-supplied ID already exists.
    #[error("Friend already exists")]
    DuplicateFriend,

    /// An expense with the same description and date already exists.
    ///
    /// This guards against the same expense being submitted twice.
    #[error("Expense already exists")]
    DuplicateExpense,

    /// The friend is already assigned to the expense.
    #[error("Friend was previously assigned to expense")]
    DuplicateFriendExpense,

    /// Tried to delete a friend that has paid something towards an expense.
    #[error("Credit balance of '{0}' is not zero")]
    FriendCreditNotZero(FriendId),

    /// Tried to remove a friend from an expense they have paid towards.
    #[error("Credit balance of friend '{friend_id}' in expense '{expense_id}' is not zero")]
    FriendExpenseCreditNotZero {
        /// The expense the friend was being removed from.
        expense_id: ExpenseId,
        /// The friend being removed.
        friend_id: FriendId,
    },

    /// The date string was not in the format `YYYY-MM-DD`.
    #[error("Malformed date '{0}' (required format: YYYY-MM-DD)")]
    InvalidDate(String),

    /// The path, query string or body of the request could not be parsed.
    #[error("{0}")]
    InvalidRequest(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Not Found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::FriendNotFound(_)
            | Error::ExpenseNotFound(_)
            | Error::FriendExpenseNotFound { .. }
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateFriend
            | Error::DuplicateExpense
            | Error::DuplicateFriendExpense
            | Error::FriendCreditNotZero(_)
            | Error::FriendExpenseCreditNotZero { .. } => StatusCode::CONFLICT,
            Error::InvalidDate(_) | Error::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The JSON body of an error response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// A human readable description of what went wrong.
    pub detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal Server Error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorDetail { detail })).into_response()
    }
}
