//! Processor configuration structures.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Environment variable overriding [`ProcessorConfig::name`].
pub const ENV_NAME: &str = "TIMER_QUEUE_NAME";
/// Environment variable overriding [`ProcessorConfig::initial_capacity`].
pub const ENV_INITIAL_CAPACITY: &str = "TIMER_QUEUE_INITIAL_CAPACITY";
/// Environment variable overriding [`ProcessorConfig::replace_existing`].
pub const ENV_REPLACE_EXISTING: &str = "TIMER_QUEUE_REPLACE_EXISTING";

/// Processor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Name used in logs to tell processors apart.
    pub name: String,
    /// Number of items the queue can hold before it first reallocates.
    pub initial_capacity: usize,
    /// Whether enqueueing a key that is already pending reschedules it.
    /// When `false` the first enqueued item for a key wins.
    pub replace_existing: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            initial_capacity: 0,
            replace_existing: true,
        }
    }
}

impl ProcessorConfig {
    /// Create a configuration with the given name and default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the initial queue capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set whether enqueueing an existing key replaces it.
    #[must_use]
    pub fn with_replace_existing(mut self, replace_existing: bool) -> Self {
        self.replace_existing = replace_existing;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        Ok(())
    }

    /// Parse processor configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the defaults overridden by environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(name) = lookup(ENV_NAME) {
            cfg.name = name;
        }
        if let Some(raw) = lookup(ENV_INITIAL_CAPACITY) {
            cfg.initial_capacity = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_INITIAL_CAPACITY}={raw:?} is not a count"))?;
        }
        if let Some(raw) = lookup(ENV_REPLACE_EXISTING) {
            cfg.replace_existing = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_REPLACE_EXISTING}={raw:?} is not a boolean"))?;
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
