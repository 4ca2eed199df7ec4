use crate::Result;

use anyhow::Context;
use fauxrm_core::stmt::DEFAULT_IN_LIST_LIMIT;
use serde::Deserialize;
use std::{fs, path::Path};

const ENV_FETCH_BATCH_SIZE: &str = "FAUXRM_FETCH_BATCH_SIZE";
const ENV_IN_LIST_LIMIT: &str = "FAUXRM_IN_LIST_LIMIT";
const ENV_DEFAULT_OWNER: &str = "FAUXRM_DEFAULT_OWNER";

/// Tuning knobs for a [`Db`](crate::Db) handle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rows a [`Cursor`](crate::Cursor) hands out per batch.
    pub fetch_batch_size: usize,

    /// Most values rendered in a single `in (...)` list. The backend's own
    /// cap wins if it is lower.
    pub in_list_limit: usize,

    /// Owner (schema) applied to unqualified table names.
    pub default_owner: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_batch_size: 100,
            in_list_limit: DEFAULT_IN_LIST_LIMIT,
            default_owner: None,
        }
    }
}

impl Config {
    /// Loads configuration from the environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "parsed config file");
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_FETCH_BATCH_SIZE) {
            config.fetch_batch_size = parse_count(ENV_FETCH_BATCH_SIZE, &value)?;
        }

        if let Some(value) = lookup(ENV_IN_LIST_LIMIT) {
            config.in_list_limit = parse_count(ENV_IN_LIST_LIMIT, &value)?;
        }

        if let Some(value) = lookup(ENV_DEFAULT_OWNER) {
            let value = value.trim();
            if !value.is_empty() {
                config.default_owner = Some(value.to_lowercase());
            }
        }

        Ok(config)
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    let count: usize = value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a positive integer; got `{value}`"))?;

    if count == 0 {
        return Err(anyhow::anyhow!("{key} must be greater than zero").into());
    }

    Ok(count)
}
