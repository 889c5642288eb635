//! # Expense API
//!
//! Entry points a presentation layer calls with `shared` request types. Each
//! call maps the request onto the domain service and maps the result back to
//! DTOs; no business rules live here.

use log::{error, info};
use shared::{
    CreateExpenseRequest, DeleteExpensesRequest, DeleteExpensesResponse, Expense as SharedExpense,
    ExpenseListResponse, UpdateExpenseRequest,
};
use std::sync::Arc;

use super::mappers::ExpenseMapper;
use crate::domain::{ExpenseError, ExpenseFormatter, ExpenseService};
use crate::storage::Connection;

pub struct ExpenseApi<C: Connection> {
    expense_service: Arc<ExpenseService<C>>,
    formatter: ExpenseFormatter,
}

impl<C: Connection> Clone for ExpenseApi<C> {
    fn clone(&self) -> Self {
        Self {
            expense_service: Arc::clone(&self.expense_service),
            formatter: self.formatter.clone(),
        }
    }
}

impl<C: Connection> ExpenseApi<C> {
    pub fn new(expense_service: Arc<ExpenseService<C>>, formatter: ExpenseFormatter) -> Self {
        Self {
            expense_service,
            formatter,
        }
    }

    pub fn service(&self) -> &Arc<ExpenseService<C>> {
        &self.expense_service
    }

    pub fn create_expense(&self, request: CreateExpenseRequest) -> Result<SharedExpense, ExpenseError> {
        info!("create_expense - request: {:?}", request);

        let date = ExpenseMapper::parse_date(&request.date)?;
        let expense = self
            .expense_service
            .add(request.name, date, request.value)
            .map_err(|e| log_failure("create expense", e))?;

        Ok(ExpenseMapper::to_dto(expense, &self.formatter))
    }

    pub fn list_expenses(&self) -> Result<ExpenseListResponse, ExpenseError> {
        let expenses = self.expense_service.list()?;
        let total: f64 = expenses.iter().map(|e| e.value).sum();
        let is_empty = expenses.is_empty();

        Ok(ExpenseListResponse {
            expenses: expenses
                .into_iter()
                .map(|e| ExpenseMapper::to_dto(e, &self.formatter))
                .collect(),
            total,
            formatted_total: self.formatter.format_value(total),
            is_empty,
        })
    }

    pub fn update_expense(&self, id: &str, request: UpdateExpenseRequest) -> Result<SharedExpense, ExpenseError> {
        info!("update_expense - id: {}, request: {:?}", id, request);

        let id = ExpenseMapper::parse_id(id)?;
        let update = ExpenseMapper::to_update(request)?;
        self.expense_service
            .update(&id, update)
            .map_err(|e| log_failure("update expense", e))?;

        let expense = self.expense_service.get(&id)?;
        Ok(ExpenseMapper::to_dto(expense, &self.formatter))
    }

    pub fn delete_expense(&self, id: &str) -> Result<DeleteExpensesResponse, ExpenseError> {
        info!("delete_expense - id: {}", id);

        let id = ExpenseMapper::parse_id(id)?;
        self.expense_service
            .delete(&id)
            .map_err(|e| log_failure("delete expense", e))?;

        Ok(delete_response(1))
    }

    pub fn delete_expenses(&self, request: DeleteExpensesRequest) -> Result<DeleteExpensesResponse, ExpenseError> {
        info!("delete_expenses - positions: {:?}", request.positions);

        let deleted = self
            .expense_service
            .delete_many(&request.positions)
            .map_err(|e| log_failure("delete expenses", e))?;

        Ok(delete_response(deleted.len()))
    }
}

fn delete_response(deleted_count: usize) -> DeleteExpensesResponse {
    let success_message = match deleted_count {
        0 => "No expenses were deleted".to_string(),
        1 => "1 expense deleted successfully".to_string(),
        n => format!("{} expenses deleted successfully", n),
    };
    DeleteExpensesResponse {
        deleted_count,
        success_message,
    }
}

fn log_failure(action: &str, e: ExpenseError) -> ExpenseError {
    error!("Failed to {}: {}", action, e);
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;

    fn create_test_api() -> ExpenseApi<MemoryConnection> {
        let service = ExpenseService::new(Arc::new(MemoryConnection::new())).unwrap();
        ExpenseApi::new(Arc::new(service), ExpenseFormatter::default())
    }

    fn create(api: &ExpenseApi<MemoryConnection>, name: &str, date: &str, value: f64) -> SharedExpense {
        api.create_expense(CreateExpenseRequest {
            name: name.to_string(),
            date: date.to_string(),
            value,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_list_response() {
        let api = create_test_api();
        let response = api.list_expenses().unwrap();
        assert!(response.is_empty);
        assert!(response.expenses.is_empty());
        assert_eq!(response.formatted_total, "£0.00");
    }

    #[test]
    fn test_create_and_list_round_trip() {
        let api = create_test_api();
        create(&api, "Coffee", "2024-01-05", 3.5);
        create(&api, "Rent", "2024-01-01", 900.0);

        let response = api.list_expenses().unwrap();
        assert!(!response.is_empty);
        let names: Vec<&str> = response.expenses.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Coffee"]);
        assert_eq!(response.total, 903.5);
        assert_eq!(response.formatted_total, "£903.50");
    }

    #[test]
    fn test_create_with_bad_date_is_rejected() {
        let api = create_test_api();
        let err = api
            .create_expense(CreateExpenseRequest {
                name: "Coffee".to_string(),
                date: "yesterday".to_string(),
                value: 3.5,
            })
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(api.list_expenses().unwrap().is_empty);
    }

    #[test]
    fn test_update_returns_new_dto() {
        let api = create_test_api();
        let coffee = create(&api, "Coffee", "2024-01-05", 3.5);

        let updated = api
            .update_expense(
                &coffee.id,
                UpdateExpenseRequest {
                    value: Some(4.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.id, coffee.id);
        assert_eq!(updated.formatted_value, "£4.00");
    }

    #[test]
    fn test_delete_by_positions_reports_count() {
        let api = create_test_api();
        create(&api, "A", "2024-01-01", 1.0);
        create(&api, "B", "2024-01-02", 2.0);
        create(&api, "C", "2024-01-03", 3.0);

        let response = api
            .delete_expenses(DeleteExpensesRequest { positions: vec![0, 2] })
            .unwrap();
        assert_eq!(response.deleted_count, 2);
        assert_eq!(response.success_message, "2 expenses deleted successfully");

        let remaining = api.list_expenses().unwrap().expenses;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "B");
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let api = create_test_api();
        let coffee = create(&api, "Coffee", "2024-01-05", 3.5);

        assert_eq!(api.delete_expense(&coffee.id).unwrap().deleted_count, 1);
        assert!(api.delete_expense(&coffee.id).unwrap_err().is_not_found());
    }
}
