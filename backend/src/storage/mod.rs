//! # Storage Module
//!
//! Handles all data persistence for the expense tracker.
//!
//! The domain layer only talks to the [`ExpenseStorage`] trait and obtains
//! repositories through a [`Connection`], so the backend can be swapped
//! without touching the domain logic.
//!
//! ## Current Implementations
//!
//! - **csv**: one `expenses.csv` file per data directory, atomic rewrites
//! - **memory**: volatile storage for tests and ephemeral sessions

pub mod csv;
pub mod memory;
pub mod traits;

pub use self::csv::{CsvConnection, ExpenseRepository};
pub use memory::{MemoryConnection, MemoryExpenseRepository};
pub use traits::{Connection, ExpenseStorage};
