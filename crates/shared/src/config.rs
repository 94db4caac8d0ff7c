//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger policy configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Persistence configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Ledger policy flags.
///
/// Both default to `false`. The defaults keep source behaviour for split totals
/// and refuse to drop a participant who still owes or is owed money.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Reject expenses whose split amounts do not sum to the total.
    #[serde(default)]
    pub enforce_split_total: bool,
    /// Allow removing a participant whose balance is not zero.
    #[serde(default)]
    pub allow_nonzero_removal: bool,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path of the append-only JSON-lines journal.
    #[serde(default = "default_journal_path")]
    pub journal_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            journal_path: default_journal_path(),
        }
    }
}

fn default_journal_path() -> PathBuf {
    PathBuf::from("data/ledger.jsonl")
}

/// Display configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places used for equal splits and formatted amounts.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_decimal_places() -> u32 {
    2
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPLITLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
