//! # Expense Tracker Backend
//!
//! Contains all non-UI logic for the expense tracker.
//!
//! - **Domain**: the expense record, the ordered store and its rules
//! - **Storage**: persistence collaborators (CSV file, in-memory)
//! - **IO**: DTO mapping for whatever presentation layer embeds this crate
//! - **Config**: data directory and display settings
//!
//! ## Architecture
//!
//! ```text
//! Presentation (out of scope)
//!     ↓
//! IO Layer (ExpenseApi, mappers)
//!     ↓
//! Domain Layer (ExpenseService, listeners)
//!     ↓
//! Storage Layer (ExpenseStorage: CSV / memory)
//! ```
//!
//! The crate only logs through the `log` facade; the embedding application
//! picks the logger.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use log::info;
use std::sync::Arc;

pub use config::ExpenseTrackerConfig;
pub use domain::{
    Expense, ExpenseError, ExpenseEvent, ExpenseFormatter, ExpenseId, ExpenseListener, ExpenseService,
    ExpenseUpdate, SubscriptionId,
};
pub use io::ExpenseApi;
pub use storage::{Connection, CsvConnection, ExpenseStorage, MemoryConnection};

/// Everything an application needs, wired to CSV storage
pub struct Backend {
    pub config: ExpenseTrackerConfig,
    pub expense_service: Arc<ExpenseService<CsvConnection>>,
    pub expense_api: ExpenseApi<CsvConnection>,
}

impl Backend {
    /// Set up the backend in the default data directory
    pub fn new() -> Result<Self> {
        Self::with_config(ExpenseTrackerConfig::load()?)
    }

    /// Set up the backend using an explicit configuration
    pub fn with_config(config: ExpenseTrackerConfig) -> Result<Self> {
        info!("Setting up storage in {}", config.data_directory.display());
        let connection = Arc::new(CsvConnection::from_config(&config)?);

        info!("Setting up domain model");
        let expense_service = Arc::new(ExpenseService::with_config(connection, &config)?);
        let expense_api = ExpenseApi::new(
            Arc::clone(&expense_service),
            ExpenseFormatter::from_config(&config),
        );

        Ok(Self {
            config,
            expense_service,
            expense_api,
        })
    }
}
