//! Expense service: the authoritative, date-ordered set of expenses.
//!
//! The service keeps the sorted view in memory and writes through to the
//! storage collaborator before changing it, so a read always sees the
//! caller's last successful write and a failed write leaves both untouched.
//! All operations are serialized through one lock; listeners run after the
//! lock is released.
use crate::config::{ExpenseTrackerConfig, DEFAULT_MAX_NAME_LENGTH};
use crate::domain::errors::ExpenseError;
use crate::domain::models::{sort_expenses, Expense, ExpenseId, ExpenseUpdate};
use crate::domain::notifications::{ExpenseEvent, ExpenseListener, ListenerRegistry, SubscriptionId};
use crate::storage::{Connection, ExpenseStorage};
use anyhow::anyhow;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

struct StoreState {
    /// Always in list order
    expenses: Vec<Expense>,
    next_sequence: u64,
}

impl StoreState {
    fn insert_sorted(&mut self, expense: Expense) {
        let key = expense.sort_key();
        let index = self.expenses.partition_point(|e| e.sort_key() < key);
        self.expenses.insert(index, expense);
    }

    fn position_of(&self, id: &ExpenseId) -> Option<usize> {
        self.expenses.iter().position(|e| e.id == *id)
    }
}

pub struct ExpenseService<C: Connection> {
    expense_repository: C::ExpenseRepository,
    state: Mutex<StoreState>,
    listeners: ListenerRegistry,
    max_name_length: usize,
}

impl<C: Connection> ExpenseService<C> {
    /// Open the store, loading whatever the connection already holds
    pub fn new(connection: Arc<C>) -> Result<Self, ExpenseError> {
        Self::with_max_name_length(connection, DEFAULT_MAX_NAME_LENGTH)
    }

    pub fn with_config(connection: Arc<C>, config: &ExpenseTrackerConfig) -> Result<Self, ExpenseError> {
        Self::with_max_name_length(connection, config.max_name_length)
    }

    fn with_max_name_length(connection: Arc<C>, max_name_length: usize) -> Result<Self, ExpenseError> {
        let expense_repository = connection.create_expense_repository();

        let mut expenses = expense_repository.list_expenses()?;
        sort_expenses(&mut expenses);
        let next_sequence = expenses
            .iter()
            .map(|e| e.sequence + 1)
            .max()
            .unwrap_or(0);

        info!("Loaded {} expenses", expenses.len());

        Ok(Self {
            expense_repository,
            state: Mutex::new(StoreState {
                expenses,
                next_sequence,
            }),
            listeners: ListenerRegistry::new(),
            max_name_length,
        })
    }

    /// Create a new expense with a fresh identity
    pub fn add(&self, name: impl Into<String>, date: NaiveDate, value: f64) -> Result<Expense, ExpenseError> {
        let name = self.validate_name(name.into())?;
        validate_value(value)?;

        let expense = {
            let mut state = self.lock_state()?;
            let expense = Expense::new(name, date, value, state.next_sequence);

            self.expense_repository.store_expense(&expense)?;

            state.next_sequence += 1;
            state.insert_sorted(expense.clone());
            expense
        };

        info!("Added expense {} ('{}', {}, {:.2})", expense.id, expense.name, expense.date, expense.value);
        self.listeners.notify(&ExpenseEvent::Added(expense.id));
        Ok(expense)
    }

    /// Snapshot of every expense, ascending by date then insertion order
    pub fn list(&self) -> Result<Vec<Expense>, ExpenseError> {
        Ok(self.lock_state()?.expenses.clone())
    }

    pub fn get(&self, id: &ExpenseId) -> Result<Expense, ExpenseError> {
        let state = self.lock_state()?;
        state
            .position_of(id)
            .map(|index| state.expenses[index].clone())
            .ok_or_else(|| not_found(id))
    }

    pub fn len(&self) -> Result<usize, ExpenseError> {
        Ok(self.lock_state()?.expenses.len())
    }

    pub fn is_empty(&self) -> Result<bool, ExpenseError> {
        Ok(self.len()? == 0)
    }

    /// Sum of every expense value
    pub fn total(&self) -> Result<f64, ExpenseError> {
        Ok(self.lock_state()?.expenses.iter().map(|e| e.value).sum())
    }

    /// Overwrite the provided fields of an expense, keeping its identity
    pub fn update(&self, id: &ExpenseId, fields: ExpenseUpdate) -> Result<(), ExpenseError> {
        let fields = ExpenseUpdate {
            name: fields.name.map(|n| self.validate_name(n)).transpose()?,
            date: fields.date,
            value: fields.value.map(validate_value).transpose()?,
        };

        {
            let mut state = self.lock_state()?;
            let index = state.position_of(id).ok_or_else(|| not_found(id))?;

            let mut updated = state.expenses[index].clone();
            if !fields.apply_to(&mut updated) {
                debug!("Update of expense {} changed nothing", id);
                return Ok(());
            }

            if !self.expense_repository.update_expense(&updated)? {
                warn!("Expense {} missing from storage during update", id);
                return Err(not_found(id));
            }

            state.expenses.remove(index);
            state.insert_sorted(updated);
        }

        info!("Updated expense {}", id);
        self.listeners.notify(&ExpenseEvent::Updated(*id));
        Ok(())
    }

    /// Delete an expense by identity
    pub fn delete(&self, id: &ExpenseId) -> Result<(), ExpenseError> {
        {
            let mut state = self.lock_state()?;
            let index = state.position_of(id).ok_or_else(|| not_found(id))?;
            self.remove_at(&mut state, index)?;
        }

        info!("Deleted expense {}", id);
        self.listeners.notify(&ExpenseEvent::Deleted(vec![*id]));
        Ok(())
    }

    /// Delete the expense currently at `position` of the sorted list
    pub fn delete_at(&self, position: usize) -> Result<ExpenseId, ExpenseError> {
        let id = {
            let mut state = self.lock_state()?;
            if position >= state.expenses.len() {
                return Err(position_out_of_range(position, state.expenses.len()));
            }
            self.remove_at(&mut state, position)?
        };

        info!("Deleted expense {} at position {}", id, position);
        self.listeners.notify(&ExpenseEvent::Deleted(vec![id]));
        Ok(id)
    }

    /// Delete the expenses at several positions of the current sorted list.
    ///
    /// Positions are resolved to identities before anything is removed, so
    /// removing one row never shifts which record a later position names.
    /// Any out-of-range position fails the whole call.
    pub fn delete_many(&self, positions: &[usize]) -> Result<Vec<ExpenseId>, ExpenseError> {
        let positions: BTreeSet<usize> = positions.iter().copied().collect();
        if positions.is_empty() {
            return Ok(Vec::new());
        }

        let ids = {
            let mut state = self.lock_state()?;
            let len = state.expenses.len();
            if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
                return Err(position_out_of_range(bad, len));
            }

            let ids: Vec<ExpenseId> = positions.iter().map(|&p| state.expenses[p].id).collect();

            let deleted = self.expense_repository.delete_expenses(&ids)?;
            if deleted as usize != ids.len() {
                warn!("Storage deleted {} of {} expenses", deleted, ids.len());
            }

            state.expenses.retain(|e| !ids.contains(&e.id));
            ids
        };

        info!("Deleted {} expenses", ids.len());
        self.listeners.notify(&ExpenseEvent::Deleted(ids.clone()));
        Ok(ids)
    }

    pub fn subscribe(&self, listener: Arc<dyn ExpenseListener>) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        self.listeners.unsubscribe(subscription)
    }

    fn remove_at(&self, state: &mut StoreState, index: usize) -> Result<ExpenseId, ExpenseError> {
        let id = state.expenses[index].id;
        if !self.expense_repository.delete_expense(&id)? {
            warn!("Expense {} missing from storage during delete", id);
        }
        state.expenses.remove(index);
        Ok(id)
    }

    fn validate_name(&self, name: String) -> Result<String, ExpenseError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ExpenseError::InvalidInput("Expense name must not be empty".to_string()));
        }
        if trimmed.chars().count() > self.max_name_length {
            return Err(ExpenseError::InvalidInput(format!(
                "Expense name must be at most {} characters",
                self.max_name_length
            )));
        }
        Ok(trimmed.to_string())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, StoreState>, ExpenseError> {
        self.state
            .lock()
            .map_err(|_| ExpenseError::Storage(anyhow!("Expense store lock poisoned")))
    }
}

fn validate_value(value: f64) -> Result<f64, ExpenseError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExpenseError::InvalidInput(format!("Expense value must be a finite number, got {}", value)))
    }
}

fn not_found(id: &ExpenseId) -> ExpenseError {
    ExpenseError::NotFound(format!("No expense with id {}", id))
}

fn position_out_of_range(position: usize, len: usize) -> ExpenseError {
    ExpenseError::NotFound(format!("Position {} is out of range for {} expenses", position, len))
}
