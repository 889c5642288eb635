//! # Configuration
//!
//! Settings for the expense tracker live in a single YAML file, `config.yaml`,
//! at the root of the data directory:
//!
//! ```text
//! Expense Tracker/
//! ├── config.yaml       ← this module manages this file
//! └── expenses.csv
//! ```
//!
//! ```yaml
//! expenses_file_name: "expenses.csv"
//! currency_code: "GBP"
//! max_name_length: 256
//! data_format_version: "1.0"
//! ```
//!
//! The data directory itself is resolved, in order, from the
//! `EXPENSE_TRACKER_DATA_DIR` environment variable, a `.expense_redirect` file
//! in the default location, and finally `~/Documents/Expense Tracker`.

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const REDIRECT_FILE_NAME: &str = ".expense_redirect";
pub const DATA_DIR_ENV_VAR: &str = "EXPENSE_TRACKER_DATA_DIR";
pub const DEFAULT_DIRECTORY_NAME: &str = "Expense Tracker";
pub const DEFAULT_EXPENSES_FILE_NAME: &str = "expenses.csv";
pub const DEFAULT_MAX_NAME_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseTrackerConfig {
    /// Directory holding the config and the expense data. Not stored in the
    /// YAML file; it is wherever the file was loaded from.
    #[serde(skip)]
    pub data_directory: PathBuf,
    /// Name of the CSV file inside the data directory
    pub expenses_file_name: String,
    /// ISO 4217 code used when formatting values for display
    pub currency_code: String,
    /// Longest accepted expense name, in characters
    pub max_name_length: usize,
    /// Data format version for future migrations
    pub data_format_version: String,
}

impl Default for ExpenseTrackerConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from(DEFAULT_DIRECTORY_NAME),
            expenses_file_name: DEFAULT_EXPENSES_FILE_NAME.to_string(),
            currency_code: "GBP".to_string(),
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            data_format_version: "1.0".to_string(),
        }
    }
}

impl ExpenseTrackerConfig {
    /// Load the configuration from the resolved default data directory
    pub fn load() -> Result<Self> {
        let data_directory = Self::resolve_data_directory()?;
        Self::load_from_directory(data_directory)
    }

    /// Load `config.yaml` from `directory`, falling back to defaults when the
    /// file does not exist yet
    pub fn load_from_directory<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        let config_path = directory.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Self = serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            debug!("Loaded config from {}", config_path.display());
            config
        } else {
            info!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        config.data_directory = directory;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to `config.yaml` in the data directory
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        fs::create_dir_all(&self.data_directory)?;

        let config_path = self.data_directory.join(CONFIG_FILE_NAME);
        let temp_path = config_path.with_extension("yaml.tmp");
        let yaml = serde_yaml::to_string(self)?;

        fs::write(&temp_path, yaml)?;
        fs::rename(&temp_path, &config_path)?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    pub fn expenses_file_path(&self) -> PathBuf {
        self.data_directory.join(&self.expenses_file_name)
    }

    fn validate(&self) -> Result<()> {
        if self.expenses_file_name.trim().is_empty() {
            return Err(anyhow!("expenses_file_name must not be empty"));
        }
        if self.max_name_length == 0 {
            return Err(anyhow!("max_name_length must be at least 1"));
        }
        Ok(())
    }

    /// Work out where expense data lives
    pub fn resolve_data_directory() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV_VAR) {
            if !dir.trim().is_empty() {
                info!("Using data directory from {}: {}", DATA_DIR_ENV_VAR, dir);
                return Ok(PathBuf::from(dir));
            }
        }

        let documents_dir = dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;

        Ok(follow_redirect(documents_dir.join(DEFAULT_DIRECTORY_NAME)))
    }
}

/// If `default_dir` contains a redirect file pointing at an existing
/// directory, return that directory instead.
fn follow_redirect(default_dir: PathBuf) -> PathBuf {
    let redirect_file = default_dir.join(REDIRECT_FILE_NAME);
    if !redirect_file.exists() {
        info!("No redirect file found, using data directory: {}", default_dir.display());
        return default_dir;
    }

    match fs::read_to_string(&redirect_file) {
        Ok(redirected_path) => {
            let path = PathBuf::from(redirected_path.trim());
            if path.is_dir() {
                info!("Found redirect file, using data directory: {}", path.display());
                path
            } else {
                warn!(
                    "Redirect file points to non-existent directory: {}. Using default.",
                    path.display()
                );
                default_dir
            }
        }
        Err(e) => {
            error!("Failed to read redirect file: {}. Using default directory.", e);
            default_dir
        }
    }
}
