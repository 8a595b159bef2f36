use crate::*;
use regex::Regex;
use thiserror::Error;

const VERSION_PATTERN: &str = r"^\d+\.\d+\.\d+$";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Exchange name is required")]
    MissingExchangeName,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("Ledger: {message}")]
    InvalidLedger { message: String },

    #[error("Logging: {message}")]
    InvalidLogging { message: String },

    #[error("Environment variable in '{field}' is not set: {value}")]
    UnresolvedEnvVar { field: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_exchange(&config.exchange, &mut report);

    match &config.accounts {
        Some(accounts) => validate_accounts(accounts, &mut report),
        None => report.add_default("accounts.starting_balance", &default_starting_balance().to_string()),
    }

    match &config.ledger {
        Some(ledger) => validate_ledger(ledger, &mut report),
        None => report.add_default("ledger.path", &default_ledger_path().display().to_string()),
    }

    match &config.logging {
        Some(logging) => validate_logging(logging, &mut report),
        None => {
            report.add_default("logging.format", LogFormat::default().as_str());
            report.add_default("logging.level", &default_log_level());
        }
    }

    if config.metrics.is_none() {
        report.add_default("metrics.enabled", "false");
    }

    report
}

fn check_env(field: &str, value: &str, report: &mut ValidationReport) {
    if has_unresolved_env_vars(value) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

fn validate_exchange(exchange: &ExchangeConfig, report: &mut ValidationReport) {
    if exchange.name.trim().is_empty() {
        report.add_error(ValidationError::MissingExchangeName);
    }
    check_env("exchange.name", &exchange.name, report);

    if exchange.description.trim().is_empty() {
        report.add_warning("exchange.description", "Exchange description is empty");
    }

    let version_ok = Regex::new(VERSION_PATTERN)
        .map(|re| re.is_match(&exchange.version))
        .unwrap_or(false);
    if !version_ok {
        report.add_error(ValidationError::InvalidVersionFormat(exchange.version.clone()));
    }
}

fn validate_accounts(accounts: &AccountsConfig, report: &mut ValidationReport) {
    if accounts.starting_balance <= 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "accounts.starting_balance".to_string(),
        });
    }
}

fn validate_ledger(ledger: &LedgerConfig, report: &mut ValidationReport) {
    let path = ledger.path.to_string_lossy();

    if path.trim().is_empty() {
        report.add_error(ValidationError::InvalidLedger {
            message: "path is required".to_string(),
        });
        return;
    }
    check_env("ledger.path", &path, report);

    if ledger.path.extension().map_or(true, |ext| ext != "json") {
        report.add_warning("ledger.path", "Ledger snapshots are JSON; consider a .json extension");
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    let level = logging.level.trim();

    if level.is_empty() {
        report.add_error(ValidationError::InvalidLogging {
            message: "level is required".to_string(),
        });
    } else if !level.contains('=') && !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogging {
            message: format!("unknown level '{}'", level),
        });
    }
}
