use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let substituted = substitution::substitute_env_vars(&content)?;
    debug!("Environment variable substitution completed");

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to the built-in defaults
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        info!("No config file at {:?}, using defaults", path);
        Ok(generate_default_config())
    }
}

#[instrument]
pub fn generate_default_config() -> MasterConfig {
    use defaults::*;

    MasterConfig {
        exchange: ExchangeConfig {
            name: "HypExchange".to_string(),
            description: "Securities exchange on a key-value ledger".to_string(),
            version: "0.1.0".to_string(),
        },
        accounts: Some(AccountsConfig {
            starting_balance: default_starting_balance(),
        }),
        ledger: Some(LedgerConfig {
            path: default_ledger_path(),
        }),
        logging: Some(LoggingConfig {
            format: LogFormat::default(),
            level: default_log_level(),
        }),
        metrics: Some(MetricsConfig { enabled: false }),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("hypx.yaml");

        let config = generate_default_config();
        save_config(&config, &path).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_load_substitutes_env_vars() {
        std::env::set_var("HYPX_TEST_PARSER_LEDGER", "/srv/hypx/ledger.json");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypx.yaml");
        fs::write(
            &path,
            "exchange:\n  name: X\n  description: Y\n  version: 1.0.0\nledger:\n  path: ${HYPX_TEST_PARSER_LEDGER}\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.ledger_path(), std::path::PathBuf::from("/srv/hypx/ledger.json"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config, generate_default_config());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypx.yaml");
        fs::write(&path, "exchange: [not, a, map]\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
