mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;

pub use core::{
    Expense, ExpenseBalance, ExpenseId, ExpenseState, NewExpense, create_expense,
    create_expense_table, get_all_expenses, get_expense, parse_date,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use get_endpoint::{get_expense_endpoint, get_expenses_endpoint};
