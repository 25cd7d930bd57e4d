//! Assigning friends to expenses and recording what they pay back.

mod assign_endpoint;
mod core;
mod credit_endpoint;
mod delete_endpoint;
mod get_endpoint;

pub use assign_endpoint::assign_friend_endpoint;
pub use core::{
    FriendExpense, FriendExpenseState, add_credit, create_friend_expense,
    create_friend_expense_table, get_expense_share, get_friend_expense,
    get_friend_expenses_by_expense, get_friend_expenses_by_friend,
};
pub use credit_endpoint::add_credit_endpoint;
pub use delete_endpoint::unassign_friend_endpoint;
pub use get_endpoint::{get_expense_friend_endpoint, get_expense_friends_endpoint};
