use std::path::PathBuf;

pub fn default_starting_balance() -> i64 {
    10_000
}

pub fn default_ledger_path() -> PathBuf {
    PathBuf::from("ledger/hypx-ledger.json")
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("hypx.yaml")
}
