//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use crate::domain::models::{Expense, ExpenseId};

/// Trait defining the interface for expense storage operations
///
/// Implementations must preserve `id` and `sequence` exactly across a
/// save/restore cycle; the domain layer relies on both for identity and
/// tie ordering.
pub trait ExpenseStorage: Send + Sync {
    /// Store a new expense
    /// Fails if an expense with the same ID is already stored
    fn store_expense(&self, expense: &Expense) -> Result<()>;

    /// Retrieve a specific expense by ID
    fn get_expense(&self, expense_id: &ExpenseId) -> Result<Option<Expense>>;

    /// List all expenses in ascending date order, ties by sequence
    fn list_expenses(&self) -> Result<Vec<Expense>>;

    /// Overwrite an existing expense in place
    /// Returns true if the expense was found and updated, false otherwise
    fn update_expense(&self, expense: &Expense) -> Result<bool>;

    /// Delete a single expense
    /// Returns true if the expense was found and deleted, false otherwise
    fn delete_expense(&self, expense_id: &ExpenseId) -> Result<bool>;

    /// Delete multiple expenses
    /// Returns the number of expenses actually deleted
    fn delete_expenses(&self, expense_ids: &[ExpenseId]) -> Result<u32>;

    /// Check which of the given IDs exist
    fn check_expenses_exist(&self, expense_ids: &[ExpenseId]) -> Result<Vec<ExpenseId>>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type (CSV files, memory)
/// and provides factory methods for creating repositories, so the domain layer
/// works with any storage backend without knowing its details.
pub trait Connection: Send + Sync + Clone {
    /// The type of ExpenseStorage this connection creates
    type ExpenseRepository: ExpenseStorage;

    /// Create a new expense repository for this connection
    fn create_expense_repository(&self) -> Self::ExpenseRepository;
}
