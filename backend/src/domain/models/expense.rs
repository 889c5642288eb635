//! Domain model for an expense.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned identity of an expense.
///
/// Two expenses with the same name, date and value are still different
/// records; the id is what update and delete target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub date: NaiveDate,
    pub value: f64,
    /// Insertion ordinal. Breaks ties between expenses on the same date and
    /// never changes after the expense is created.
    pub sequence: u64,
}

impl Expense {
    pub fn new(name: String, date: NaiveDate, value: f64, sequence: u64) -> Self {
        Self {
            id: ExpenseId::generate(),
            name,
            date,
            value,
            sequence,
        }
    }

    /// Key the store enumerates by: date first, then insertion order.
    pub fn sort_key(&self) -> (NaiveDate, u64) {
        (self.date, self.sequence)
    }
}

/// Sort expenses into list order (ascending date, stable on insertion order).
pub fn sort_expenses(expenses: &mut [Expense]) {
    expenses.sort_by_key(Expense::sort_key);
}

/// Fields to overwrite on an existing expense. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub value: Option<f64>,
}

impl ExpenseUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date.is_none() && self.value.is_none()
    }

    /// Write the provided fields into `expense`. Returns whether anything
    /// actually changed.
    pub fn apply_to(&self, expense: &mut Expense) -> bool {
        let mut changed = false;
        if let Some(name) = &self.name {
            if *name != expense.name {
                expense.name = name.clone();
                changed = true;
            }
        }
        if let Some(date) = self.date {
            if date != expense.date {
                expense.date = date;
                changed = true;
            }
        }
        if let Some(value) = self.value {
            if value.to_bits() != expense.value.to_bits() {
                expense.value = value;
                changed = true;
            }
        }
        changed
    }
}
