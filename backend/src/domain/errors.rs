//! Errors surfaced by the expense domain.

/// Every variant leaves the store exactly as it was before the failed call.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ExpenseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExpenseError::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ExpenseError::InvalidInput(_))
    }
}
