//! Worker configuration, read once per process from the environment.

/// Origins allowed when `ALLOWED_ORIGINS` is unset.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://namoryx.github.io",
    "http://127.0.0.1:5500",
    "http://localhost:5500",
    "http://127.0.0.1:5173",
    "http://localhost:5173",
];

pub const DEFAULT_DATABASE: &str = "neo4j";

fn default_upstream_timeout() -> u64 {
    30
}

/// Guard worker configuration.
///
/// Secrets are never defaulted; a missing one is reported per request.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub neo4j_uri: Option<String>,
    pub neo4j_user: Option<String>,
    pub neo4j_password: Option<String>,
    pub database: String,
    pub allowed_origins: Vec<String>,
    pub upstream_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            neo4j_uri: None,
            neo4j_user: None,
            neo4j_password: None,
            database: DEFAULT_DATABASE.to_string(),
            allowed_origins: default_allowed_origins(),
            upstream_timeout_secs: default_upstream_timeout(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `NEO4J_URI` | Graph database URI (`neo4j+s://…`) |
    /// | `NEO4J_USER` | Username |
    /// | `NEO4J_PASSWORD` | Password |
    /// | `NEO4J_DATABASE` | Database name (default `neo4j`) |
    /// | `ALLOWED_ORIGINS` | Comma-separated CORS allowlist |
    /// | `QUEST_UPSTREAM_TIMEOUT` | Upstream timeout in seconds (default 30) |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`WorkerConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            neo4j_uri: read("NEO4J_URI"),
            neo4j_user: read("NEO4J_USER"),
            neo4j_password: read("NEO4J_PASSWORD"),
            database: read("NEO4J_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            allowed_origins: read("ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_else(default_allowed_origins),
            upstream_timeout_secs: read("QUEST_UPSTREAM_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_upstream_timeout),
        }
    }

    /// Set upstream credentials.
    pub fn with_upstream(
        mut self,
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.neo4j_uri = Some(uri.into());
        self.neo4j_user = Some(user.into());
        self.neo4j_password = Some(password.into());
        self
    }

    /// Replace the CORS allowlist.
    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Names of the required secrets that are not set.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        [
            ("NEO4J_URI", &self.neo4j_uri),
            ("NEO4J_USER", &self.neo4j_user),
            ("NEO4J_PASSWORD", &self.neo4j_password),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| k)
        .collect()
    }

    /// HTTPS query endpoint derived from the configured URI.
    pub fn query_endpoint(&self) -> Option<String> {
        let uri = self.neo4j_uri.as_deref()?;
        let base = uri
            .replacen("neo4j+s://", "https://", 1)
            .replacen("neo4j://", "https://", 1);
        Some(format!(
            "{}/db/{}/query/v2",
            base.trim_end_matches('/'),
            self.database
        ))
    }
}

/// Split a comma list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
