pub mod expense;

pub use expense::{sort_expenses, Expense, ExpenseId, ExpenseUpdate};
