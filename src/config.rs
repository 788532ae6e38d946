use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{CacheConfig, RetentionPolicy};

pub const DEFAULT_BASE_URL: &str = "https://www.ecfr.gov";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value `{value}` for {var}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

// Serializable, comparable, explicit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub retention: RetentionPolicy,
    #[serde(default)]
    pub spool_dir: Option<PathBuf>,
    /// Worker threads for aggregation; 0 lets the pool pick.
    pub workers: usize,
}

impl EngineConfig {
    pub fn v0() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            // whole titles run to tens of megabytes
            timeout_secs: 300,
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
            retention: RetentionPolicy::RetainForRun,
            spool_dir: None,
            workers: 0,
        }
    }

    /// `v0()` overridden by `CFR_TALLY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::v0();

        if let Some(url) = lookup("CFR_TALLY_BASE_URL") {
            config.base_url = url;
        }
        if let Some(v) = lookup("CFR_TALLY_TIMEOUT_SECS") {
            config.timeout_secs = parse_var("CFR_TALLY_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("CFR_TALLY_MAX_RETRIES") {
            config.max_retries = parse_var("CFR_TALLY_MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("CFR_TALLY_RETENTION") {
            config.retention = parse_var("CFR_TALLY_RETENTION", &v)?;
        }
        if let Some(dir) = lookup("CFR_TALLY_SPOOL_DIR").filter(|d| !d.trim().is_empty()) {
            config.spool_dir = Some(PathBuf::from(dir));
        }
        if let Some(v) = lookup("CFR_TALLY_WORKERS") {
            config.workers = parse_var("CFR_TALLY_WORKERS", &v)?;
        }

        Ok(config)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            retention: self.retention,
            spool_dir: self.spool_dir.clone(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::v0()
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var: var.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
