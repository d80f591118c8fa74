// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered configuration: `sq.toml`, then environment, then flags

use serde::{Deserialize, Serialize};
use sq_core::EncoderTuning;
use sq_engine::{default_pool_size, PoolConfig, RestartPolicy};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "sq.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid {name} '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// `[pool]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSection {
    /// Worker threads; defaults to min(cores, 4)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<usize>,
    /// Queue bound; 0 disables it
    pub max_queue: usize,
    pub max_pixels: u64,
    /// `never` or `replace`
    pub restart: String,
    pub shutdown_grace_ms: u64,
}

impl Default for PoolSection {
    fn default() -> Self {
        let defaults = PoolConfig::default();
        Self {
            pool_size: None,
            max_queue: defaults.max_queue.unwrap_or(0),
            max_pixels: defaults.max_pixels,
            restart: "never".to_string(),
            shutdown_grace_ms: u64::try_from(defaults.shutdown_grace.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pool: PoolSection,
    pub tuning: EncoderTuning,
}

/// Raw values of the SQ_* override variables
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub pool_size: Option<String>,
    pub max_queue: Option<String>,
    pub max_pixels: Option<String>,
    pub restart: Option<String>,
    pub shutdown_grace_ms: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            pool_size: crate::env::pool_size(),
            max_queue: crate::env::max_queue(),
            max_pixels: crate::env::max_pixels(),
            restart: crate::env::restart(),
            shutdown_grace_ms: crate::env::shutdown_grace_ms(),
        }
    }
}

fn parse_value<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Where to look for the config file: flag > SQ_CONFIG > user config dir.
///
/// The boolean is true when the path was asked for explicitly, in which
/// case a missing file is an error.
pub fn resolve_path(flag: Option<&Path>) -> Option<(PathBuf, bool)> {
    if let Some(path) = flag {
        return Some((path.to_path_buf(), true));
    }
    if let Some(path) = crate::env::config_path() {
        return Some((path, true));
    }
    dirs::config_dir().map(|dir| (dir.join("sq").join(CONFIG_FILE), false))
}

impl Config {
    /// Load the file named by `flag` (or the default locations) and apply
    /// environment overrides.
    pub fn load(flag: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_path(flag) {
            Some((path, true)) => Self::from_file(&path)?,
            Some((path, false)) if path.is_file() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(&EnvOverrides::from_env())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn apply_env(&mut self, env: &EnvOverrides) -> Result<(), ConfigError> {
        if let Some(value) = &env.pool_size {
            self.pool.pool_size = Some(parse_value("SQ_POOL_SIZE", value)?);
        }
        if let Some(value) = &env.max_queue {
            self.pool.max_queue = parse_value("SQ_MAX_QUEUE", value)?;
        }
        if let Some(value) = &env.max_pixels {
            self.pool.max_pixels = parse_value("SQ_MAX_PIXELS", value)?;
        }
        if let Some(value) = &env.restart {
            // Validate now so the error names the variable
            parse_value::<RestartPolicy>("SQ_RESTART", value)?;
            self.pool.restart = value.trim().to_ascii_lowercase();
        }
        if let Some(value) = &env.shutdown_grace_ms {
            self.pool.shutdown_grace_ms = parse_value("SQ_SHUTDOWN_GRACE_MS", value)?;
        }
        Ok(())
    }

    /// Fill in computed defaults so the printed config shows what runs
    pub fn effective(mut self) -> Self {
        self.pool.pool_size = Some(self.pool.pool_size.unwrap_or_else(default_pool_size));
        self
    }

    pub fn pool_config(&self) -> Result<PoolConfig, ConfigError> {
        let pool = &self.pool;
        let pool_size = pool.pool_size.unwrap_or_else(default_pool_size);
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "pool_size",
                value: pool_size.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if pool.max_pixels == 0 {
            return Err(ConfigError::Invalid {
                name: "max_pixels",
                value: pool.max_pixels.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let restart = parse_value::<RestartPolicy>("restart", &pool.restart)?;

        Ok(PoolConfig::default()
            .with_pool_size(pool_size)
            .with_max_queue((pool.max_queue > 0).then_some(pool.max_queue))
            .with_max_pixels(pool.max_pixels)
            .with_restart(restart)
            .with_shutdown_grace(Duration::from_millis(pool.shutdown_grace_ms))
            .with_tuning(self.tuning))
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
