//! # Domain Module
//!
//! Business logic for the expense tracker, independent of any UI framework
//! or storage mechanism.
//!
//! ## Module Organization
//!
//! - **models**: the `Expense` record, its identity and partial updates
//! - **expense_service**: the ordered store and its CRUD operations
//! - **notifications**: listener contract for views that refresh on change
//! - **expense_formatter**: short date and currency strings for list rows
//! - **errors**: the error kinds every operation can return
//!
//! ## Business Rules
//!
//! - Expense names are trimmed and must not be empty
//! - Values may be positive or negative but must be finite
//! - Expenses are listed by ascending date; same-day expenses keep the order
//!   they were added in
//! - A failed operation never changes stored or cached state

pub mod errors;
pub mod expense_formatter;
pub mod expense_service;
pub mod models;
pub mod notifications;

pub use errors::ExpenseError;
pub use expense_formatter::ExpenseFormatter;
pub use expense_service::ExpenseService;
pub use models::{Expense, ExpenseId, ExpenseUpdate};
pub use notifications::{ExpenseEvent, ExpenseListener, SubscriptionId};
