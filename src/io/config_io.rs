use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Environment variables that override the config file
pub const ENV_URL: &str = "TASKFLOW_URL";
pub const ENV_ANON_KEY: &str = "TASKFLOW_ANON_KEY";

/// Keys accepted by `tf config set`
pub const SETTABLE_KEYS: [&str; 5] = [
    "backend.url",
    "backend.anon_key",
    "backend.table",
    "backend.timeout_secs",
    "ui.notification_secs",
];

/// Error type for config I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key '{0}' (expected one of: {keys})", keys = SETTABLE_KEYS.join(", "))]
    UnknownKey(String),
    #[error("'{key}' expects a whole number, got '{value}'")]
    NotANumber { key: String, value: String },
    #[error("no backend configured: set backend.url and backend.anon_key (or TASKFLOW_URL / TASKFLOW_ANON_KEY)")]
    MissingBackend,
}

/// Default location of config.toml
pub fn default_config_path() -> PathBuf {
    super::config_dir().join("config.toml")
}

/// Read config.toml. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Apply environment overrides on top of file values
pub fn apply_env(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(ENV_URL).filter(|v| !v.is_empty()) {
        config.backend.url = url;
    }
    if let Some(key) = lookup(ENV_ANON_KEY).filter(|v| !v.is_empty()) {
        config.backend.anon_key = key;
    }
}

/// Read config.toml and apply the process environment
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut config = read_config(path)?;
    apply_env(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Fail early when there is nowhere to send requests
pub fn require_backend(config: &Config) -> Result<(), ConfigError> {
    if config.backend.url.trim().is_empty() || config.backend.anon_key.trim().is_empty() {
        return Err(ConfigError::MissingBackend);
    }
    Ok(())
}

/// Set a dotted key in the config document, preserving comments and layout
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), ConfigError> {
    if !SETTABLE_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }
    let (table, field) = key.split_once('.').ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    if !doc.contains_key(table) {
        doc[table] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[table][field] = if field.ends_with("_secs") {
        // TOML integers are signed; the config fields are not.
        let n = value
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| ConfigError::NotANumber {
                key: key.to_string(),
                value: value.to_string(),
            })?;
        toml_edit::value(n)
    } else {
        toml_edit::value(value)
    };
    Ok(())
}

/// Read, edit, and write back config.toml, creating it if needed
pub fn update_config_file(path: &Path, key: &str, value: &str) -> Result<(), ConfigError> {
    let text = if path.exists() {
        fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        String::new()
    };
    let mut doc: toml_edit::DocumentMut = text.parse()?;
    set_value(&mut doc, key, value)?;

    let write_err = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    fs::write(path, doc.to_string()).map_err(write_err)?;
    Ok(())
}
