use chrono::NaiveDate;
use shared::{AmountType, Expense as SharedExpense, UpdateExpenseRequest};

use crate::domain::{Expense as DomainExpense, ExpenseError, ExpenseFormatter, ExpenseId, ExpenseUpdate};

const DTO_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn to_dto(domain: DomainExpense, formatter: &ExpenseFormatter) -> SharedExpense {
        SharedExpense {
            id: domain.id.to_string(),
            date: domain.date.format(DTO_DATE_FORMAT).to_string(),
            formatted_date: formatter.format_date(domain.date),
            formatted_value: formatter.format_value(domain.value),
            value_type: AmountType::classify(domain.value),
            name: domain.name,
            value: domain.value,
        }
    }

    pub fn to_update(request: UpdateExpenseRequest) -> Result<ExpenseUpdate, ExpenseError> {
        Ok(ExpenseUpdate {
            name: request.name,
            date: request.date.as_deref().map(Self::parse_date).transpose()?,
            value: request.value,
        })
    }

    pub fn parse_date(date: &str) -> Result<NaiveDate, ExpenseError> {
        NaiveDate::parse_from_str(date.trim(), DTO_DATE_FORMAT).map_err(|e| {
            ExpenseError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD: {}", date, e))
        })
    }

    pub fn parse_id(id: &str) -> Result<ExpenseId, ExpenseError> {
        id.parse::<ExpenseId>()
            .map_err(|e| ExpenseError::InvalidInput(format!("Invalid expense id '{}': {}", id, e)))
    }
}
