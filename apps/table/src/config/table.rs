use std::env;

use thiserror::Error;

use crate::store::RetryPolicy;

/// Which document store backs the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// In-process store; state is lost on exit.
    Memory,
    /// Shared Redis store, reachable at the given URL.
    Redis { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),
    #[error("Environment variable '{name}' has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Fixed shuffle seed; `None` draws one from OS entropy per game.
    pub seed: Option<u32>,
    pub store: StoreKind,
    pub training_wheels: bool,
    pub cas_max_attempts: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seed: None,
            store: StoreKind::Memory,
            training_wheels: true,
            cas_max_attempts: RetryPolicy::default().max_attempts,
        }
    }
}

impl TableConfig {
    /// Read `TABLE_SEED`, `TABLE_STORE`, `REDIS_URL`, `TABLE_TRAINING_WHEELS`
    /// and `TABLE_CAS_MAX_ATTEMPTS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            seed: parsed_var("TABLE_SEED", "expected an unsigned 32-bit integer")?,
            store: store_kind()?,
            training_wheels: flag("TABLE_TRAINING_WHEELS")?.unwrap_or(defaults.training_wheels),
            cas_max_attempts: match parsed_var::<u32>("TABLE_CAS_MAX_ATTEMPTS", "expected a positive integer")? {
                Some(0) => {
                    return Err(ConfigError::Invalid {
                        name: "TABLE_CAS_MAX_ATTEMPTS",
                        value: "0".to_string(),
                        reason: "expected a positive integer",
                    })
                }
                Some(attempts) => attempts,
                None => defaults.cas_max_attempts,
            },
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.cas_max_attempts)
    }
}

/// Non-empty value of `name`, if set.
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(
    name: &'static str,
    reason: &'static str,
) -> Result<Option<T>, ConfigError> {
    optional_var(name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
                name,
                value,
                reason,
            })
        })
        .transpose()
}

fn flag(name: &'static str) -> Result<Option<bool>, ConfigError> {
    let Some(value) = optional_var(name) else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid {
            name,
            value,
            reason: "expected true or false",
        }),
    }
}

fn store_kind() -> Result<StoreKind, ConfigError> {
    let Some(kind) = optional_var("TABLE_STORE") else {
        return Ok(StoreKind::Memory);
    };
    match kind.trim().to_ascii_lowercase().as_str() {
        "memory" => Ok(StoreKind::Memory),
        "redis" => {
            let url = optional_var("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?;
            Ok(StoreKind::Redis { url })
        }
        _ => Err(ConfigError::Invalid {
            name: "TABLE_STORE",
            value: kind,
            reason: "expected memory or redis",
        }),
    }
}
