/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// This module provides RAII-based cleanup that guarantees test data is removed
/// even if tests panic or fail.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use anyhow::Result;
use super::connection::CsvConnection;

/// RAII Test Environment that automatically cleans up on drop
///
/// The temporary directory lives as long as the environment; dropping it
/// removes every file the test wrote.
pub struct TestEnvironment {
    /// The temporary directory - kept alive to prevent auto-cleanup until drop
    _temp_dir: TempDir,
    /// The CSV connection for the test
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with automatic cleanup
    pub fn new() -> Result<Self> {
        Self::new_with_prefix("expense_tracker_test")
    }

    /// Create a new test environment with a custom prefix for debugging
    pub fn new_with_prefix(prefix: &str) -> Result<Self> {
        init_test_logging();

        let temp_dir = TempDir::with_prefix(prefix)?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    /// Get the base directory path for this test environment
    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("EXPENSE_TRACKER_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// Route `log` output through env_logger; `RUST_LOG=debug` shows it.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
