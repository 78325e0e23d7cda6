use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

fn default_inventory_aware() -> bool {
  true
}

fn default_log_filter() -> String {
  "cashpoint=debug".to_string()
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub atm: AtmConfig,
  #[serde(default)]
  pub logging: LoggingConfig,
  #[serde(default)]
  pub cards: Vec<CardConfig>,
  #[serde(default)]
  pub accounts: Vec<AccountConfig>,
  #[serde(default)]
  pub depot: Vec<DepotSlotConfig>,
}

/// Machine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AtmConfig {
  pub id: String,
  /// Bound payouts by the depot stock and reserve dispensed notes
  #[serde(default = "default_inventory_aware")]
  pub inventory_aware: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
  /// `EnvFilter` directive used when `RUST_LOG` is not set
  #[serde(default = "default_log_filter")]
  pub filter: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      filter: default_log_filter(),
    }
  }
}

/// Card known to the in-memory card provider
#[derive(Clone, Deserialize)]
pub struct CardConfig {
  pub number: String,
  pub pin: u32,
  pub user_id: String,
}

impl std::fmt::Debug for CardConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CardConfig")
      .field("number", &"***")
      .field("pin", &"***")
      .field("user_id", &self.user_id)
      .finish()
  }
}

/// Account held by the in-memory ledger
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
  pub user_id: String,
  pub currency: String,
  pub balance: u64,
}

/// Initial banknote stock of one depot cassette
#[derive(Debug, Clone, Deserialize)]
pub struct DepotSlotConfig {
  pub currency: String,
  pub face_value: u64,
  pub count: u32,
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with CASHPOINT_ prefix
  ///
  /// # Environment Variables
  ///
  /// Environment variables use the CASHPOINT_ prefix and are separated by double underscores:
  /// - `CASHPOINT_ATM__ID=atm-042`
  /// - `CASHPOINT_ATM__INVENTORY_AWARE=false`
  /// - `CASHPOINT_LOGGING__FILTER=cashpoint=info`
  ///
  /// # Errors
  ///
  /// Returns a `ConfigError` if:
  /// - config/default.toml is missing
  /// - Configuration files contain invalid TOML
  /// - Required configuration values are missing or have invalid types
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("CASHPOINT")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_structure() {
    let toml = r#"
            [atm]
            id = "atm-001"

            [[cards]]
            number = "123"
            pin = 123
            user_id = "1"

            [[accounts]]
            user_id = "1"
            currency = "PL"
            balance = 1000

            [[depot]]
            currency = "PL"
            face_value = 100
            count = 20
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert_eq!(config.atm.id, "atm-001");
    assert!(config.atm.inventory_aware); // default
    assert_eq!(config.logging.filter, "cashpoint=debug"); // default
    assert_eq!(config.cards.len(), 1);
    assert_eq!(config.cards[0].pin, 123);
    assert_eq!(config.accounts[0].balance, 1000);
    assert_eq!(config.depot[0].face_value, 100);
    assert_eq!(config.depot[0].count, 20);
  }

  #[test]
  fn test_minimal_config() {
    let toml = r#"
            [atm]
            id = "atm-002"
            inventory_aware = false
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert!(!config.atm.inventory_aware);
    assert!(config.cards.is_empty());
    assert!(config.accounts.is_empty());
    assert!(config.depot.is_empty());
  }

  #[test]
  fn test_card_config_debug_hides_card() {
    let card = CardConfig {
      number: "4111111111111111".to_string(),
      pin: 9876,
      user_id: "u-1".to_string(),
    };

    let debug = format!("{:?}", card);
    assert!(!debug.contains("4111111111111111"));
    assert!(!debug.contains("9876"));
  }
}
