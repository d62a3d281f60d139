//! Service configuration via `mnemo.toml`
//!
//! Settings come from the config file, then a few environment variables
//! override them (`MNEMO_API_KEY`, `MNEMO_BIND`, `MNEMO_SQLITE_DB_PATH` and
//! the `REDIS_*` connection settings). Restart to pick up changes.

use mnemo_backup::BackupConfig;
use mnemo_core::{Error, Result};
use mnemo_storage::{RedisConfig, StreamStoreConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "mnemo.toml";

/// API key used when none is configured
pub const DEFAULT_API_KEY: &str = "default-dev-key";

/// Environment variable overriding `server.api_key`
pub const ENV_API_KEY: &str = "MNEMO_API_KEY";
/// Environment variable overriding `server.bind`
pub const ENV_BIND: &str = "MNEMO_BIND";
/// Environment variable overriding `backup.path`
pub const ENV_SQLITE_DB_PATH: &str = "MNEMO_SQLITE_DB_PATH";
/// Environment variable overriding `primary.redis.host`
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";
/// Environment variable overriding `primary.redis.port`
pub const ENV_REDIS_PORT: &str = "REDIS_PORT";
/// Environment variable overriding `primary.redis.password`
pub const ENV_REDIS_PASSWORD: &str = "REDIS_PASSWORD";
/// Environment variable overriding `primary.redis.db`
pub const ENV_REDIS_DB: &str = "REDIS_DB";

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Shared secret expected in the `X-API-KEY` header
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            api_key: default_api_key(),
        }
    }
}

/// Which primary store to run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryBackend {
    /// Redis streams
    #[default]
    Redis,
    /// In-process streams; lost on restart
    Memory,
}

/// `[primary]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrimaryConfig {
    /// Store backing the project logs
    #[serde(default)]
    pub backend: PrimaryBackend,
    /// Upper bound on entries held by the in-process stream store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    /// Redis connection
    #[serde(default)]
    pub redis: RedisSection,
}

/// `[primary.redis]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedisSection {
    /// Server host
    #[serde(default = "default_redis_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_redis_port")]
    pub port: u16,
    /// Password; empty for none
    #[serde(default)]
    pub password: String,
    /// Logical database
    #[serde(default)]
    pub db: i64,
    /// Connect and command timeout in milliseconds
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_host() -> String {
    "localhost".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_redis_timeout_ms() -> u64 {
    2000
}

impl Default for RedisSection {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            password: String::new(),
            db: 0,
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

/// `[backup]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupSection {
    /// SQLite database file
    #[serde(default = "default_backup_path")]
    pub path: PathBuf,
    /// Use write-ahead logging
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// Busy timeout in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_backup_path() -> PathBuf {
    PathBuf::from("/data/memory.db")
}

fn default_true() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            path: default_backup_path(),
            wal_mode: true,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Service configuration loaded from `mnemo.toml`.
///
/// # Example
///
/// ```toml
/// [server]
/// bind = "0.0.0.0:8000"
/// api_key = "change-me"
///
/// [backup]
/// path = "/data/memory.db"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MnemoConfig {
    /// HTTP settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Stream store settings
    #[serde(default)]
    pub primary: PrimaryConfig,
    /// SQLite settings
    #[serde(default)]
    pub backup: BackupSection,
}

impl MnemoConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Mnemo configuration

[server]
# Listen address (env: MNEMO_BIND)
bind = "0.0.0.0:8000"
# Shared secret checked against the X-API-KEY header (env: MNEMO_API_KEY)
api_key = "default-dev-key"

[primary]
# "redis" for Redis streams, "memory" for in-process streams lost on restart
backend = "redis"
# Upper bound on entries held by the in-process store; unbounded when unset.
# max_entries = 1000000

[primary.redis]
# env: REDIS_HOST, REDIS_PORT, REDIS_PASSWORD, REDIS_DB
host = "localhost"
port = 6379
password = ""
db = 0
timeout_ms = 2000

[backup]
# SQLite mirror; the directory is created if missing (env: MNEMO_SQLITE_DB_PATH)
path = "/data/memory.db"
wal_mode = true
busy_timeout_ms = 5000
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load from an optional file, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Load from `path`, first writing the default file there if it is missing.
    ///
    /// Environment overrides apply as in [`load`](Self::load).
    pub fn load_or_create(path: &Path) -> Result<Self> {
        Self::write_default_if_missing(path)?;
        Self::load(Some(path))
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Empty values are ignored, and so are numbers that do not parse.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        if let Some(key) = get(ENV_API_KEY) {
            self.server.api_key = key;
        }
        if let Some(bind) = get(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(path) = get(ENV_SQLITE_DB_PATH) {
            self.backup.path = PathBuf::from(path);
        }

        let redis = &mut self.primary.redis;
        if let Some(host) = get(ENV_REDIS_HOST) {
            redis.host = host;
        }
        if let Some(password) = get(ENV_REDIS_PASSWORD) {
            redis.password = password;
        }
        if let Some(raw) = get(ENV_REDIS_PORT) {
            match raw.parse() {
                Ok(port) => redis.port = port,
                Err(_) => warn!(value = %raw, "ignoring unparseable {}", ENV_REDIS_PORT),
            }
        }
        if let Some(raw) = get(ENV_REDIS_DB) {
            match raw.parse() {
                Ok(db) => redis.db = db,
                Err(_) => warn!(value = %raw, "ignoring unparseable {}", ENV_REDIS_DB),
            }
        }
        self
    }

    /// Whether the built-in development key is in effect
    pub fn uses_default_api_key(&self) -> bool {
        self.server.api_key == DEFAULT_API_KEY
    }

    /// Stream store settings
    pub fn stream_store_config(&self) -> StreamStoreConfig {
        StreamStoreConfig {
            max_entries: self.primary.max_entries,
        }
    }

    /// Redis settings
    pub fn redis_config(&self) -> RedisConfig {
        let redis = &self.primary.redis;
        RedisConfig {
            host: redis.host.clone(),
            port: redis.port,
            password: redis.password.clone(),
            db: redis.db,
            timeout: Duration::from_millis(redis.timeout_ms),
        }
    }

    /// SQLite settings
    pub fn backup_config(&self) -> BackupConfig {
        BackupConfig {
            path: self.backup.path.clone(),
            wal_mode: self.backup.wal_mode,
            busy_timeout: Duration::from_millis(self.backup.busy_timeout_ms),
        }
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}
