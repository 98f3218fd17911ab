//! Configuration for synchronization runs
//!
//! Settings are read from a YAML file (`config.yaml`). Lookup order:
//! - an explicit path (`--config` / `SHEETSYNC_CONFIG`)
//! - `<config dir>/sheetsync/config.yaml`
//! - built-in defaults
//!
//! Command line flags override file values afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{self, Result, SyncError};
use crate::sheet::SheetRange;

/// Default capacity of both batches
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Registrant whose models are never queued for the model sheet
pub const DEFAULT_SELF_REGISTRANT: &str = "meshery";

/// What a component flush does to pending model rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushPolicy {
    /// Model and component batches flush on their own thresholds
    #[default]
    Independent,
    /// A component flush also clears pending model rows without writing them
    Coupled,
}

/// Settings for one synchronization run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub model_batch_size: usize,
    pub component_batch_size: usize,
    pub self_registrant: String,
    pub flush_policy: FlushPolicy,
    /// Start cell of model rows, e.g. `Models!A4`
    pub models_range: String,
    /// Start cell of component rows, e.g. `Components!A4`
    pub components_range: String,
    pub channel_capacity: usize,
    pub request_timeout_secs: u64,
    pub api_base_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            model_batch_size: DEFAULT_BATCH_SIZE,
            component_batch_size: DEFAULT_BATCH_SIZE,
            self_registrant: DEFAULT_SELF_REGISTRANT.to_string(),
            flush_policy: FlushPolicy::Independent,
            models_range: "Models!A4".to_string(),
            components_range: "Components!A4".to_string(),
            channel_capacity: 256,
            request_timeout_secs: 30,
            api_base_url: "https://sheets.googleapis.com".to_string(),
        }
    }
}

impl SyncConfig {
    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(error::config::not_found(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| error::config::parse_failed(path.display().to_string(), e))?;
        Self::from_yaml(&content).map_err(|e| match e {
            SyncError::ConfigParseFailed { reason, .. } => {
                error::config::parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    /// Load from `explicit`, else from the default location if it exists, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Check value ranges and sheet ranges
    pub fn validate(&self) -> Result<()> {
        if self.model_batch_size == 0 {
            return Err(error::config::invalid("model_batch_size must be at least 1"));
        }
        if self.component_batch_size == 0 {
            return Err(error::config::invalid(
                "component_batch_size must be at least 1",
            ));
        }
        if self.channel_capacity == 0 {
            return Err(error::config::invalid("channel_capacity must be at least 1"));
        }
        SheetRange::parse(&self.models_range)?;
        SheetRange::parse(&self.components_range)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Default configuration file location
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sheetsync").join("config.yaml"))
}
