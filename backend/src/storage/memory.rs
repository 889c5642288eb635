//! # In-Memory Storage
//!
//! Volatile expense storage for tests and throwaway sessions. Repositories
//! created from the same `MemoryConnection` share one collection, so a new
//! service built on that connection sees what an earlier one stored, the same
//! way a CSV-backed service sees the file after a restart.

use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::models::{sort_expenses, Expense, ExpenseId};
use crate::storage::traits::{Connection, ExpenseStorage};

#[derive(Clone, Default)]
pub struct MemoryConnection {
    expenses: Arc<Mutex<Vec<Expense>>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connection for MemoryConnection {
    type ExpenseRepository = MemoryExpenseRepository;

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        MemoryExpenseRepository {
            expenses: Arc::clone(&self.expenses),
        }
    }
}

#[derive(Clone)]
pub struct MemoryExpenseRepository {
    expenses: Arc<Mutex<Vec<Expense>>>,
}

impl MemoryExpenseRepository {
    fn expenses(&self) -> Result<MutexGuard<'_, Vec<Expense>>> {
        self.expenses
            .lock()
            .map_err(|_| anyhow!("In-memory expense storage lock poisoned"))
    }
}

impl ExpenseStorage for MemoryExpenseRepository {
    fn store_expense(&self, expense: &Expense) -> Result<()> {
        let mut expenses = self.expenses()?;
        if expenses.iter().any(|e| e.id == expense.id) {
            return Err(anyhow!("Expense {} already exists", expense.id));
        }
        expenses.push(expense.clone());
        debug!("Stored expense in memory: {}", expense.id);
        Ok(())
    }

    fn get_expense(&self, expense_id: &ExpenseId) -> Result<Option<Expense>> {
        Ok(self.expenses()?.iter().find(|e| e.id == *expense_id).cloned())
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        let mut expenses = self.expenses()?.clone();
        sort_expenses(&mut expenses);
        Ok(expenses)
    }

    fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let mut expenses = self.expenses()?;
        match expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => {
                *existing = expense.clone();
                Ok(true)
            }
            None => {
                warn!("Expense not found for update: {}", expense.id);
                Ok(false)
            }
        }
    }

    fn delete_expense(&self, expense_id: &ExpenseId) -> Result<bool> {
        let mut expenses = self.expenses()?;
        let initial_len = expenses.len();
        expenses.retain(|e| e.id != *expense_id);
        Ok(expenses.len() < initial_len)
    }

    fn delete_expenses(&self, expense_ids: &[ExpenseId]) -> Result<u32> {
        let mut expenses = self.expenses()?;
        let initial_len = expenses.len();
        expenses.retain(|e| !expense_ids.contains(&e.id));
        Ok((initial_len - expenses.len()) as u32)
    }

    fn check_expenses_exist(&self, expense_ids: &[ExpenseId]) -> Result<Vec<ExpenseId>> {
        Ok(self
            .expenses()?
            .iter()
            .filter(|e| expense_ids.contains(&e.id))
            .map(|e| e.id)
            .collect())
    }
}
