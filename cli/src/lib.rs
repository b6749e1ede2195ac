use serde::{Deserialize, Serialize};
use stakebook_execution::CurrencyFormat;
use std::{fs, path::Path, str::FromStr};
use thiserror::Error;
use tracing::Level;

pub mod defaults;
pub mod input;
pub mod render;

/// Configuration for the `stakebook` binary.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_json")]
    pub log_json: bool,
    /// Currency preset code (`USD`, `EUR`).
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Overrides the preset when set.
    #[serde(default)]
    pub currency_format: Option<CurrencyFormat>,
    /// Validate inputs and reject oversold offers before settling.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("unknown currency: {value}")]
    UnknownCurrency { value: String },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

/// [`Config`] after parsing and range checks.
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub log_level: Level,
    pub log_json: bool,
    pub currency: CurrencyFormat,
    pub strict: bool,
}

fn default_log_level() -> String {
    defaults::DEFAULT_LOG_LEVEL.to_string()
}

fn default_log_json() -> bool {
    defaults::DEFAULT_LOG_JSON
}

fn default_currency() -> String {
    defaults::DEFAULT_CURRENCY.to_string()
}

fn default_strict() -> bool {
    defaults::DEFAULT_STRICT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: default_log_json(),
            currency: default_currency(),
            currency_format: None,
            strict: default_strict(),
        }
    }
}

fn ensure_not_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyField { field });
    }
    Ok(())
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        let currency = match self.currency_format {
            Some(format) => format,
            None => CurrencyFormat::preset(&self.currency).ok_or_else(|| {
                ConfigError::UnknownCurrency {
                    value: self.currency.clone(),
                }
            })?,
        };
        ensure_not_empty("currency_format.decimal_separator", &currency.decimal_separator)?;
        ensure_not_empty("currency_format.symbol", &currency.symbol)?;

        Ok(ValidatedConfig {
            log_level,
            log_json: self.log_json,
            currency,
            strict: self.strict,
        })
    }
}
