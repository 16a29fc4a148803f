//! Registry configuration.
//!
//! Every field is optional in TOML; missing fields fall back to the
//! defaults below.
//!
//! ```toml
//! delay_secs = 10
//! worker_reward = 100
//! collision_policy = "reject"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Seconds between `schedule` and the task becoming due.
pub const DEFAULT_DELAY_SECS: u64 = 10;

/// Amount credited to `count` when a task is applied.
pub const DEFAULT_WORKER_REWARD: u64 = 100;

/// What `schedule` does when the user already has a pending task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fail with `AlreadyScheduled`.
    #[default]
    Reject,
    /// Drop the pending task and schedule a fresh one.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,

    #[serde(default = "default_worker_reward")]
    pub worker_reward: u64,

    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

fn default_delay_secs() -> u64 {
    DEFAULT_DELAY_SECS
}

fn default_worker_reward() -> u64 {
    DEFAULT_WORKER_REWARD
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
            worker_reward: default_worker_reward(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl RosterConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(config_path = %path.display(), "loading roster config");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = RosterConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, RosterConfig::default());
        assert_eq!(cfg.delay_secs, 10);
        assert_eq!(cfg.worker_reward, 100);
        assert_eq!(cfg.collision_policy, CollisionPolicy::Reject);
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let cfg = RosterConfig::from_toml_str("collision_policy = \"replace\"\ndelay_secs = 3").unwrap();
        assert_eq!(cfg.delay_secs, 3);
        assert_eq!(cfg.worker_reward, DEFAULT_WORKER_REWARD);
        assert_eq!(cfg.collision_policy, CollisionPolicy::Replace);
    }

    #[test]
    fn bad_policy_is_a_parse_error() {
        let err = RosterConfig::from_toml_str("collision_policy = \"queue\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = RosterConfig::load("/definitely/not/here/roster.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
