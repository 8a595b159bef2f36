use observability::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExchangeConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccountsConfig {
    /// Balance credited to every newly registered trader
    #[serde(default = "default_starting_balance")]
    pub starting_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// JSON snapshot file backing the ledger
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Root of `hypx.yaml`
///
/// Only `exchange` is required; every other section falls back to its
/// defaults when omitted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MasterConfig {
    pub exchange: ExchangeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<AccountsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<LedgerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsConfig>,
}

impl MasterConfig {
    pub fn starting_balance(&self) -> i64 {
        self.accounts
            .as_ref()
            .map_or_else(default_starting_balance, |a| a.starting_balance)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.ledger
            .as_ref()
            .map_or_else(default_ledger_path, |l| l.path.clone())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.as_ref().map(|l| l.format).unwrap_or_default()
    }

    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .map_or_else(default_log_level, |l| l.level.clone())
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics.as_ref().is_some_and(|m| m.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let yaml = r#"
exchange:
  name: Test Exchange
  description: Test
  version: 0.1.0
"#;
        let config: MasterConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.starting_balance(), 10_000);
        assert_eq!(config.ledger_path(), PathBuf::from("ledger/hypx-ledger.json"));
        assert_eq!(config.log_format(), LogFormat::Pretty);
        assert_eq!(config.log_level(), "info");
        assert!(!config.metrics_enabled());
    }

    #[test]
    fn test_sections_override_defaults() {
        let yaml = r#"
exchange:
  name: Test Exchange
  description: Test
  version: 0.1.0
accounts:
  starting_balance: 500
ledger:
  path: /tmp/ledger.json
logging:
  format: json
metrics:
  enabled: true
"#;
        let config: MasterConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.starting_balance(), 500);
        assert_eq!(config.ledger_path(), PathBuf::from("/tmp/ledger.json"));
        assert_eq!(config.log_format(), LogFormat::Json);
        // Field default inside a present section
        assert_eq!(config.log_level(), "info");
        assert!(config.metrics_enabled());
    }
}
