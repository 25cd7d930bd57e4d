//! Credit and debit balance calculations.
//!
//! An expense is split evenly between the friends assigned to it and the
//! person who paid for it. The payer is not stored as a friend, so every
//! split counts one more share than there are friends.

/// The number of shares in an expense that belong to the payer.
const PAYER_SHARES: i64 = 1;

/// The number of people splitting an expense with `linked_friends` friends
/// assigned to it, counting the payer.
pub fn num_friends(linked_friends: i64) -> i64 {
    linked_friends + PAYER_SHARES
}

/// The amount each person owes for an expense of `expense_amount` split
/// between `linked_friends` friends and the payer.
pub fn share_per_friend(expense_amount: f64, linked_friends: i64) -> f64 {
    expense_amount / num_friends(linked_friends) as f64
}

/// The total amount paid, given each individual payment.
pub fn credit_balance(payments: impl IntoIterator<Item = f64>) -> f64 {
    payments.into_iter().sum()
}

/// An expense as seen by one of the friends assigned to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseShare {
    /// The total cost of the expense.
    pub expense_amount: f64,
    /// How many friends are assigned to the expense, including this one.
    pub linked_friends: i64,
}

impl ExpenseShare {
    /// The number of people splitting the expense, counting the payer.
    pub fn num_friends(&self) -> i64 {
        num_friends(self.linked_friends)
    }

    /// The amount each person owes for the expense.
    pub fn per_friend(&self) -> f64 {
        share_per_friend(self.expense_amount, self.linked_friends)
    }
}

/// The total amount a friend owes across the expenses they share.
pub fn debit_balance(shares: impl IntoIterator<Item = ExpenseShare>) -> f64 {
    shares.into_iter().map(|share| share.per_friend()).sum()
}
