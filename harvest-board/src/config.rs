//! Board configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML/YAML/JSON
//! file, then `HARVEST_BOARD_*` environment variables.

use crate::error::Result;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "HARVEST_BOARD_";

/// How a failed move restores the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollbackStrategy {
    /// Put back the snapshot taken just before the move
    #[default]
    Restore,
    /// Re-fetch the full list from the task source, falling back to the
    /// snapshot if that fails too
    Refetch,
}

/// Settings for the move coordinator and command processor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Give up on a persistence call after this many milliseconds.
    /// No limit when unset.
    pub persist_timeout_ms: Option<u64>,

    pub rollback: RollbackStrategy,

    /// Actor recorded on activity log entries
    pub actor: Option<String>,
}

impl BoardConfig {
    /// Build the layered figment without extracting it
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(BoardConfig::default()));

        if let Some(path) = file {
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config: BoardConfig = Self::figment(file).extract()?;
        debug!(?config, "loaded board configuration");
        Ok(config)
    }

    /// The persistence timeout, if one is configured
    pub fn persist_timeout(&self) -> Option<Duration> {
        self.persist_timeout_ms.map(Duration::from_millis)
    }
}
