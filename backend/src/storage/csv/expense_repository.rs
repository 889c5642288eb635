use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::{Reader, WriterBuilder};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::{sort_expenses, Expense, ExpenseId};
use crate::storage::traits::ExpenseStorage;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One line of `expenses.csv`
#[derive(Debug, Serialize, Deserialize)]
struct ExpenseRow {
    id: String,
    name: String,
    date: String,
    value: f64,
    sequence: u64,
}

impl ExpenseRow {
    fn from_domain(expense: &Expense) -> Self {
        Self {
            id: expense.id.to_string(),
            name: expense.name.clone(),
            date: expense.date.format(DATE_FORMAT).to_string(),
            value: expense.value,
            sequence: expense.sequence,
        }
    }

    fn into_domain(self) -> Result<Expense> {
        let id = self
            .id
            .parse::<ExpenseId>()
            .map_err(|e| anyhow!("Invalid expense id '{}': {}", self.id, e))?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .with_context(|| format!("Invalid date '{}' for expense {}", self.date, self.id))?;

        Ok(Expense {
            id,
            name: self.name,
            date,
            value: self.value,
            sequence: self.sequence,
        })
    }
}

/// CSV-based expense repository
///
/// Every write rewrites the whole file in list order through a temp file, so
/// a crash mid-write leaves the previous contents intact.
#[derive(Clone)]
pub struct ExpenseRepository {
    connection: CsvConnection,
}

impl ExpenseRepository {
    /// Create a new CSV expense repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all expenses from the CSV file
    fn read_expenses(&self) -> Result<Vec<Expense>> {
        self.connection.ensure_expenses_file_exists()?;

        let file_path = self.connection.get_expenses_file_path();
        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut expenses = Vec::new();
        for (index, result) in csv_reader.deserialize::<ExpenseRow>().enumerate() {
            // Header is line 1
            let line = index + 2;
            let row = result.with_context(|| {
                format!("Malformed row at line {} of {}", line, file_path.display())
            })?;
            expenses.push(row.into_domain()?);
        }

        debug!("Read {} expenses from {}", expenses.len(), file_path.display());
        Ok(expenses)
    }

    /// Write all expenses to the CSV file, sorted into list order
    fn write_expenses(&self, expenses: &mut [Expense]) -> Result<()> {
        sort_expenses(expenses);

        let file_path = self.connection.get_expenses_file_path();
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let mut csv_writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));

            // Written by hand so an empty store still has a header
            csv_writer.write_record(["id", "name", "date", "value", "sequence"])?;
            for expense in expenses.iter() {
                csv_writer.serialize(ExpenseRow::from_domain(expense))?;
            }

            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

impl ExpenseStorage for ExpenseRepository {
    fn store_expense(&self, expense: &Expense) -> Result<()> {
        info!("Storing expense in CSV: {}", expense.id);

        let mut expenses = self.read_expenses()?;
        if expenses.iter().any(|e| e.id == expense.id) {
            return Err(anyhow!("Expense {} already exists", expense.id));
        }

        expenses.push(expense.clone());
        self.write_expenses(&mut expenses)?;

        info!("Successfully stored expense: {}", expense.id);
        Ok(())
    }

    fn get_expense(&self, expense_id: &ExpenseId) -> Result<Option<Expense>> {
        let expenses = self.read_expenses()?;
        Ok(expenses.into_iter().find(|e| e.id == *expense_id))
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        let mut expenses = self.read_expenses()?;
        sort_expenses(&mut expenses);
        Ok(expenses)
    }

    fn update_expense(&self, expense: &Expense) -> Result<bool> {
        info!("Updating expense in CSV: {}", expense.id);

        let mut expenses = self.read_expenses()?;
        match expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => {
                *existing = expense.clone();
                self.write_expenses(&mut expenses)?;
                info!("Successfully updated expense: {}", expense.id);
                Ok(true)
            }
            None => {
                warn!("Expense not found for update: {}", expense.id);
                Ok(false)
            }
        }
    }

    fn delete_expense(&self, expense_id: &ExpenseId) -> Result<bool> {
        info!("Deleting expense from CSV: {}", expense_id);

        let mut expenses = self.read_expenses()?;
        let initial_len = expenses.len();
        expenses.retain(|e| e.id != *expense_id);

        if expenses.len() < initial_len {
            self.write_expenses(&mut expenses)?;
            info!("Successfully deleted expense: {}", expense_id);
            Ok(true)
        } else {
            warn!("Expense not found for deletion: {}", expense_id);
            Ok(false)
        }
    }

    fn delete_expenses(&self, expense_ids: &[ExpenseId]) -> Result<u32> {
        info!("Deleting {} expenses from CSV", expense_ids.len());

        let mut expenses = self.read_expenses()?;
        let initial_len = expenses.len();
        expenses.retain(|e| !expense_ids.contains(&e.id));

        let deleted_count = (initial_len - expenses.len()) as u32;
        if deleted_count > 0 {
            self.write_expenses(&mut expenses)?;
            info!("Successfully deleted {} expenses", deleted_count);
        }

        Ok(deleted_count)
    }

    fn check_expenses_exist(&self, expense_ids: &[ExpenseId]) -> Result<Vec<ExpenseId>> {
        let expenses = self.read_expenses()?;
        Ok(expenses
            .iter()
            .filter(|e| expense_ids.contains(&e.id))
            .map(|e| e.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn setup_test_repo() -> (TestEnvironment, ExpenseRepository) {
        let env = TestEnvironment::new().unwrap();
        let repo = ExpenseRepository::new(env.connection.clone());
        (env, repo)
    }

    #[test]
    fn test_store_and_retrieve_expense() {
        let (_env, repo) = setup_test_repo();
        let expense = Expense::new("Coffee".to_string(), date("2024-01-05"), 3.5, 0);

        repo.store_expense(&expense).unwrap();

        let retrieved = repo.get_expense(&expense.id).unwrap().unwrap();
        assert_eq!(retrieved, expense);
    }

    #[test]
    fn test_store_rejects_duplicate_id() {
        let (_env, repo) = setup_test_repo();
        let expense = Expense::new("Coffee".to_string(), date("2024-01-05"), 3.5, 0);

        repo.store_expense(&expense).unwrap();
        assert!(repo.store_expense(&expense).is_err());
        assert_eq!(repo.list_expenses().unwrap().len(), 1);
    }

    #[test]
    fn test_list_is_sorted_by_date_then_sequence() {
        let (_env, repo) = setup_test_repo();
        repo.store_expense(&Expense::new("Coffee".to_string(), date("2024-01-05"), 3.5, 0)).unwrap();
        repo.store_expense(&Expense::new("Rent".to_string(), date("2024-01-01"), 900.0, 1)).unwrap();
        repo.store_expense(&Expense::new("Lunch".to_string(), date("2024-01-05"), 8.25, 2)).unwrap();

        let names: Vec<String> = repo.list_expenses().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Rent", "Coffee", "Lunch"]);
    }

    #[test]
    fn test_names_with_commas_and_quotes_survive() {
        let (_env, repo) = setup_test_repo();
        let expense = Expense::new("Dinner, \"fancy\"".to_string(), date("2024-03-10"), -12.75, 0);

        repo.store_expense(&expense).unwrap();

        let listed = repo.list_expenses().unwrap();
        assert_eq!(listed[0].name, "Dinner, \"fancy\"");
        assert_eq!(listed[0].value, -12.75);
    }

    #[test]
    fn test_update_expense_in_place() {
        let (_env, repo) = setup_test_repo();
        let mut expense = Expense::new("Coffee".to_string(), date("2024-01-05"), 3.5, 0);
        repo.store_expense(&expense).unwrap();

        expense.value = 4.0;
        assert!(repo.update_expense(&expense).unwrap());

        let retrieved = repo.get_expense(&expense.id).unwrap().unwrap();
        assert_eq!(retrieved.value, 4.0);
    }

    #[test]
    fn test_update_missing_expense_returns_false() {
        let (_env, repo) = setup_test_repo();
        let expense = Expense::new("Ghost".to_string(), date("2024-01-05"), 1.0, 0);

        assert!(!repo.update_expense(&expense).unwrap());
        assert!(repo.list_expenses().unwrap().is_empty());
    }

    #[test]
    fn test_delete_expense() {
        let (_env, repo) = setup_test_repo();
        let expense = Expense::new("Coffee".to_string(), date("2024-01-05"), 3.5, 0);
        repo.store_expense(&expense).unwrap();

        assert!(repo.delete_expense(&expense.id).unwrap());
        assert!(repo.get_expense(&expense.id).unwrap().is_none());
        assert!(!repo.delete_expense(&expense.id).unwrap());
    }

    #[test]
    fn test_delete_multiple_expenses() {
        let (_env, repo) = setup_test_repo();
        let a = Expense::new("A".to_string(), date("2024-01-01"), 1.0, 0);
        let b = Expense::new("B".to_string(), date("2024-01-02"), 2.0, 1);
        let c = Expense::new("C".to_string(), date("2024-01-03"), 3.0, 2);
        for e in [&a, &b, &c] {
            repo.store_expense(e).unwrap();
        }

        let deleted = repo.delete_expenses(&[a.id, c.id, ExpenseId::generate()]).unwrap();
        assert_eq!(deleted, 2);

        let remaining = repo.list_expenses().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }

    #[test]
    fn test_check_expenses_exist() {
        let (_env, repo) = setup_test_repo();
        let a = Expense::new("A".to_string(), date("2024-01-01"), 1.0, 0);
        repo.store_expense(&a).unwrap();

        let missing = ExpenseId::generate();
        assert_eq!(repo.check_expenses_exist(&[a.id, missing]).unwrap(), vec![a.id]);
    }

    #[test]
    fn test_data_survives_new_repository() {
        let (env, repo) = setup_test_repo();
        let expense = Expense::new("Rent".to_string(), date("2024-01-01"), 900.0, 7);
        repo.store_expense(&expense).unwrap();

        let reopened = ExpenseRepository::new(CsvConnection::new(env.base_directory()).unwrap());
        assert_eq!(reopened.list_expenses().unwrap(), vec![expense]);
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let (env, repo) = setup_test_repo();
        fs::write(
            env.connection.get_expenses_file_path(),
            "id,name,date,value,sequence\nnot-a-uuid,Coffee,2024-01-05,3.5,0\n",
        )
        .unwrap();

        assert!(repo.list_expenses().is_err());
    }
}
