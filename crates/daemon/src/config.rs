// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: defaults, optional TOML file, command-line flags

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
pub const DEFAULT_STORE_PATH: &str = "./mx-clients.jsonl";
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(180);
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(180);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Command-line flags for `mxd`
#[derive(Parser, Debug, Default)]
#[command(name = "mxd", version, about = "mx - named mutexes over HTTP")]
pub struct Args {
    /// TOML configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Listen address and port
    #[arg(long)]
    pub listen: Option<String>,

    /// Path to the client registration log
    #[arg(long = "store")]
    pub store_path: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file")]
    pub log_path: Option<PathBuf>,

    /// Secret identifier required by /stats (random if unset)
    #[arg(long)]
    pub admin_id: Option<String>,

    /// Ceiling on how long a lock request may wait (e.g. "3m", "30s")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub max_wait: Option<Duration>,

    /// Time between idle-client purge scans
    #[arg(long, value_parser = humantime::parse_duration)]
    pub purge_interval: Option<Duration>,

    /// Time allowed for a client to send its request head
    #[arg(long, value_parser = humantime::parse_duration)]
    pub request_timeout: Option<Duration>,
}

/// Contents of a configuration file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub listen: Option<String>,
    pub store_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub admin_id: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub max_wait: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub purge_interval: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Resolved daemon configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen: String,
    pub store_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub admin_id: String,
    /// Whether `admin_id` was generated because none was configured
    pub admin_id_generated: bool,
    pub max_wait: Duration,
    pub purge_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_path: None,
            admin_id: uuid::Uuid::new_v4().to_string(),
            admin_id_generated: true,
            max_wait: DEFAULT_MAX_WAIT,
            purge_interval: DEFAULT_PURGE_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Resolve from flags, reading the file they point at (if any)
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::layered(file, args)
    }

    /// Defaults, then file values, then flag values
    pub fn layered(file: FileConfig, args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(listen) = args.listen.clone().or(file.listen) {
            config.listen = listen;
        }
        if let Some(path) = args.store_path.clone().or(file.store_path) {
            config.store_path = path;
        }
        config.log_path = args.log_path.clone().or(file.log_path);
        if let Some(admin_id) = args.admin_id.clone().or(file.admin_id) {
            if admin_id.trim().is_empty() {
                return Err(ConfigError::Invalid("admin_id must not be empty".to_string()));
            }
            config.admin_id = admin_id;
            config.admin_id_generated = false;
        }
        if let Some(wait) = args.max_wait.or(file.max_wait) {
            config.max_wait = wait;
        }
        if let Some(interval) = args.purge_interval.or(file.purge_interval) {
            config.purge_interval = interval;
        }
        if let Some(timeout) = args.request_timeout.or(file.request_timeout) {
            config.request_timeout = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.purge_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "purge_interval must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
