//! Client-side configuration for the dispatcher.
//!
//! The dispatcher never reads the environment itself; callers build a
//! [`ClientConfig`] (explicitly or via [`ClientConfig::from_env`]) and inject it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Worker URL used when none is configured.
pub const DEFAULT_WORKER_URL: &str = "https://neo4j-runner.neo4j-namoryx.workers.dev/run";

/// Database used by the direct path when none is configured.
pub const DEFAULT_DATABASE: &str = "neo4j";

/// Credentials for calling the graph database directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectConfig {
    pub endpoint: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default = "default_database")]
    pub database: String,
}

impl DirectConfig {
    /// Returns `None` unless endpoint, username and password are all non-empty.
    pub fn from_parts(
        endpoint: Option<String>,
        username: Option<String>,
        password: Option<String>,
        database: Option<String>,
    ) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(Self {
            endpoint: present(endpoint)?,
            username: present(username)?,
            password: present(password)?,
            database: present(database).unwrap_or_else(default_database),
        })
    }
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_worker_url() -> String {
    DEFAULT_WORKER_URL.to_string()
}

fn default_direct_timeout_ms() -> u64 {
    5000
}

fn default_worker_timeout_ms() -> u64 {
    2500
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Direct upstream; `None` disables the direct path.
    #[serde(default)]
    pub direct: Option<DirectConfig>,

    /// Base worker URL; its `/run` sibling is tried as well.
    #[serde(default = "default_worker_url")]
    pub worker_url: String,

    /// Time budget for the direct call in milliseconds.
    #[serde(default = "default_direct_timeout_ms")]
    pub direct_timeout_ms: u64,

    /// Time budget for each worker call in milliseconds.
    #[serde(default = "default_worker_timeout_ms")]
    pub worker_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            direct: None,
            worker_url: default_worker_url(),
            direct_timeout_ms: default_direct_timeout_ms(),
            worker_timeout_ms: default_worker_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `NEO4J_ENDPOINT` | Direct query endpoint |
    /// | `NEO4J_USERNAME` | Direct username |
    /// | `NEO4J_PASSWORD` | Direct password |
    /// | `NEO4J_DATABASE` | Database name (default `neo4j`) |
    /// | `NEO4J_WORKER_URL` | Guard worker URL |
    ///
    /// Each name is also accepted with a `VITE_` prefix, which takes
    /// precedence.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(&format!("VITE_{key}"))
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(key).filter(|v| !v.is_empty()))
        };

        Self {
            direct: DirectConfig::from_parts(
                read("NEO4J_ENDPOINT"),
                read("NEO4J_USERNAME"),
                read("NEO4J_PASSWORD"),
                read("NEO4J_DATABASE"),
            ),
            worker_url: read("NEO4J_WORKER_URL").unwrap_or_else(default_worker_url),
            ..Self::default()
        }
    }

    /// Set the direct upstream.
    pub fn with_direct(mut self, direct: DirectConfig) -> Self {
        self.direct = Some(direct);
        self
    }

    /// Set the worker base URL.
    pub fn with_worker_url(mut self, url: impl Into<String>) -> Self {
        self.worker_url = url.into();
        self
    }

    /// Set both per-attempt time budgets.
    pub fn with_timeouts(mut self, direct: Duration, worker: Duration) -> Self {
        self.direct_timeout_ms = direct.as_millis() as u64;
        self.worker_timeout_ms = worker.as_millis() as u64;
        self
    }

    pub fn direct_timeout(&self) -> Duration {
        Duration::from_millis(self.direct_timeout_ms)
    }

    pub fn worker_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_timeout_ms)
    }
}
