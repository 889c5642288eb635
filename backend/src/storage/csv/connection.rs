use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::expense_repository::ExpenseRepository;
use crate::config::{ExpenseTrackerConfig, DEFAULT_EXPENSES_FILE_NAME};
use crate::storage::traits::Connection;

pub const EXPENSES_CSV_HEADER: &str = "id,name,date,value,sequence\n";

/// CsvConnection manages the data directory and makes sure the expenses file exists
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
    expenses_file_name: String,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        Self::with_file_name(base_directory, DEFAULT_EXPENSES_FILE_NAME)
    }

    /// Create a new CSV connection using a custom file name for the expenses
    pub fn with_file_name<P: AsRef<Path>>(base_directory: P, file_name: &str) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            info!("Creating data directory: {}", base_path.display());
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
            expenses_file_name: file_name.to_string(),
        })
    }

    /// Create a connection for the directory and file named in the config
    pub fn from_config(config: &ExpenseTrackerConfig) -> Result<Self> {
        Self::with_file_name(&config.data_directory, &config.expenses_file_name)
    }

    /// Create a connection in the default data directory
    pub fn new_default() -> Result<Self> {
        Self::from_config(&ExpenseTrackerConfig::load()?)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn get_expenses_file_path(&self) -> PathBuf {
        self.base_directory.join(&self.expenses_file_name)
    }

    /// Ensure the expenses CSV exists, writing just the header if it does not
    pub fn ensure_expenses_file_exists(&self) -> Result<()> {
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
        }

        let file_path = self.get_expenses_file_path();
        if !file_path.exists() {
            fs::write(&file_path, EXPENSES_CSV_HEADER)?;
            info!("Created expenses file: {}", file_path.display());
        }

        Ok(())
    }
}

impl Connection for CsvConnection {
    type ExpenseRepository = ExpenseRepository;

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        ExpenseRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");

        let connection = CsvConnection::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(connection.get_expenses_file_path(), nested.join("expenses.csv"));
    }

    #[test]
    fn test_ensure_file_writes_header_once() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        connection.ensure_expenses_file_exists().unwrap();
        let path = connection.get_expenses_file_path();
        fs::write(&path, format!("{}keep-me\n", EXPENSES_CSV_HEADER)).unwrap();

        connection.ensure_expenses_file_exists().unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("keep-me\n"));
    }

    #[test]
    fn test_from_config_uses_configured_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let config = ExpenseTrackerConfig {
            data_directory: temp_dir.path().to_path_buf(),
            expenses_file_name: "spending.csv".to_string(),
            ..Default::default()
        };

        let connection = CsvConnection::from_config(&config).unwrap();
        assert_eq!(connection.get_expenses_file_path(), config.expenses_file_path());
    }
}
