//! Application settings loaded from config.toml
//!
//! The file controls the currency label used by the formatter, the search debounce used by
//! the state manager, and the categories seeded for every new user. Every section is
//! optional; anything left out falls back to the built-in defaults.

use crate::{
    errors::{Error, Result},
    models::TransactionType,
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "BIZTRACK_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// The whole config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Display formatting options
    #[serde(default)]
    pub display: DisplayConfig,
    /// State manager tuning
    #[serde(default)]
    pub state: StateConfig,
    /// Categories seeded for new users
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            state: StateConfig::default(),
            categories: default_categories(),
        }
    }
}

impl AppConfig {
    /// Configured categories for one transaction type, in file order.
    pub fn categories_for(&self, kind: TransactionType) -> impl Iterator<Item = &CategoryConfig> {
        self.categories.iter().filter(move |c| c.kind == kind)
    }
}

/// `[display]` section
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Label prefixed to every formatted amount
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_label: default_currency_label(),
        }
    }
}

/// `[state]` section
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Quiet period after the last keystroke before a search reload is issued
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

/// One `[[categories]]` entry
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
    /// Transaction type this category belongs to
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Chart colour
    #[serde(default = "default_color")]
    pub color: String,
}

impl CategoryConfig {
    fn new(name: &str, kind: TransactionType, color: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            color: color.to_string(),
        }
    }
}

fn default_currency_label() -> String {
    "KSh".to_string()
}

const fn default_search_debounce_ms() -> u64 {
    300
}

fn default_color() -> String {
    "#3B82F6".to_string()
}

fn default_categories() -> Vec<CategoryConfig> {
    use TransactionType::{Expense, Income};
    vec![
        CategoryConfig::new("Sales", Income, "#10B981"),
        CategoryConfig::new("Services", Income, "#3B82F6"),
        CategoryConfig::new("Other Income", Income, "#06B6D4"),
        CategoryConfig::new("Supplies", Expense, "#F59E0B"),
        CategoryConfig::new("Marketing", Expense, "#EF4444"),
        CategoryConfig::new("Rent", Expense, "#8B5CF6"),
        CategoryConfig::new("Utilities", Expense, "#06B6D4"),
        CategoryConfig::new("Transport", Expense, "#3B82F6"),
        CategoryConfig::new("Other", Expense, "#6B7280"),
    ]
}

/// Parses configuration from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] when the TOML is malformed or a field has the wrong type.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `BIZTRACK_CONFIG` or `./config.toml`, falling back to the
/// built-in defaults when the file does not exist.
///
/// # Errors
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!(
            "Loaded configuration from {path} ({} categories)",
            config.categories.len()
        );
        Ok(config)
    } else {
        info!("No configuration file at {path}, using defaults");
        Ok(AppConfig::default())
    }
}
