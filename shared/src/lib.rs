use serde::{Deserialize, Serialize};

/// An expense as handed to presentation code.
///
/// The raw fields mirror the domain record; the `formatted_*` fields are
/// precomputed so a view can render a row without any date or currency logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Store-assigned identity (hyphenated UUID)
    pub id: String,
    /// Label entered by the user
    pub name: String,
    /// Calendar date in `YYYY-MM-DD` form
    pub date: String,
    /// Signed amount (positive for money spent, negative for refunds)
    pub value: f64,
    /// Short date for list rows, e.g. "Jan 5"
    pub formatted_date: String,
    /// Value with currency symbol, e.g. "£3.50" or "-£2.00"
    pub formatted_value: String,
    /// Sign of the value for styling
    pub value_type: AmountType,
}

/// Sign of an amount for styling and display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AmountType {
    Positive,
    Negative,
    Zero,
}

impl AmountType {
    pub fn classify(value: f64) -> Self {
        if value > 0.0 {
            AmountType::Positive
        } else if value < 0.0 {
            AmountType::Negative
        } else {
            AmountType::Zero
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    /// Label for the expense (must not be blank)
    pub name: String,
    /// Calendar date in `YYYY-MM-DD` form
    pub date: String,
    pub value: f64,
}

/// Partial update; omitted fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Calendar date in `YYYY-MM-DD` form
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Delete the rows at these positions of the list the caller is showing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpensesRequest {
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpensesResponse {
    pub deleted_count: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    /// Expenses in ascending date order
    pub expenses: Vec<Expense>,
    pub total: f64,
    pub formatted_total: String,
    /// True when there is nothing to list, so the view can show its empty state
    pub is_empty: bool,
}
