//! Configuration system for Rendezvous.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $RENDEZVOUS_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/rendezvous/config.toml
//!   3. ~/.config/rendezvous/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default gap after which a silent community is dropped.
pub const DEFAULT_LIVENESS_TIMEOUT_SECS: u64 = 5 * 60;
/// Default period between reaper sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RendezvousConfig {
    pub network: NetworkConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// TCP port for the HTTP server.
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Seconds without a register or heartbeat before a community expires.
    pub liveness_timeout_secs: u64,
    /// Seconds between reaper sweeps.
    pub sweep_interval_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            liveness_timeout_secs: DEFAULT_LIVENESS_TIMEOUT_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl RegistryConfig {
    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_secs(self.liveness_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("rendezvous")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl RendezvousConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_file(&Self::file_path())?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.sanitize();
        Ok(config)
    }

    /// Parse the file at `path`, or return defaults if it does not exist.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("RENDEZVOUS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&RendezvousConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply env var overrides, reading variables through `lookup`.
    ///
    /// `PORT` is honoured for hosting platforms that inject it;
    /// `RENDEZVOUS_NETWORK__PORT` takes precedence over it.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for key in ["PORT", "RENDEZVOUS_NETWORK__PORT"] {
            if let Some(p) = lookup(key).and_then(|v| v.parse().ok()) {
                self.network.port = p;
            }
        }
        if let Some(v) = lookup("RENDEZVOUS_NETWORK__BIND") {
            self.network.bind = v;
        }
        if let Some(s) = lookup("RENDEZVOUS_REGISTRY__LIVENESS_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
        {
            self.registry.liveness_timeout_secs = s;
        }
        if let Some(s) = lookup("RENDEZVOUS_REGISTRY__SWEEP_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
        {
            self.registry.sweep_interval_secs = s;
        }
    }

    /// Replace zero durations with defaults. A zero sweep interval would
    /// panic inside `tokio::time::interval`.
    pub fn sanitize(&mut self) {
        if self.registry.liveness_timeout_secs == 0 {
            tracing::warn!(
                default = DEFAULT_LIVENESS_TIMEOUT_SECS,
                "liveness_timeout_secs is 0, using default"
            );
            self.registry.liveness_timeout_secs = DEFAULT_LIVENESS_TIMEOUT_SECS;
        }
        if self.registry.sweep_interval_secs == 0 {
            tracing::warn!(
                default = DEFAULT_SWEEP_INTERVAL_SECS,
                "sweep_interval_secs is 0, using default"
            );
            self.registry.sweep_interval_secs = DEFAULT_SWEEP_INTERVAL_SECS;
        }
    }
}
