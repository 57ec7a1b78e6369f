//! Upstream call: one statement against the graph database query API.
//!
//! This is the ONLY place that talks to the database. Handlers get a
//! [`RunOutcome`] and decide the HTTP status from it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::mapping::{format_records, Record};

const PREVIEW_CHARS: usize = 300;

/// Outcome of a statement that reached the upstream (or could not be sent
/// for lack of configuration).
#[derive(Debug)]
pub enum RunOutcome {
    Success(QuerySuccess),
    Failure(QueryFailure),
}

#[derive(Debug)]
pub struct QuerySuccess {
    pub status: u16,
    pub endpoint: String,
    pub records: Vec<Record>,
    pub raw: Value,
}

impl QuerySuccess {
    /// Full `{ok:true, ...}` body.
    pub fn envelope(&self) -> Value {
        json!({
            "ok": true,
            "status": self.status,
            "endpoint": self.endpoint,
            "records": self.records,
            "raw": self.raw,
        })
    }
}

/// Failures reported back to the caller as `{ok:false, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFailure {
    MissingSecrets {
        missing: Vec<&'static str>,
    },
    NotJson {
        status: u16,
        content_type: String,
        endpoint: String,
        preview: String,
    },
    Status {
        status: u16,
        error: String,
        endpoint: String,
    },
}

impl QueryFailure {
    pub fn message(&self) -> &str {
        match self {
            Self::MissingSecrets { .. } => "Missing Worker secrets",
            Self::NotJson { .. } => "Neo4j did not return JSON",
            Self::Status { error, .. } => error,
        }
    }

    /// `{ok:false, error, ...}` body.
    pub fn envelope(&self) -> Value {
        match self {
            Self::MissingSecrets { missing } => json!({
                "ok": false,
                "error": self.message(),
                "missing": missing,
            }),
            Self::NotJson {
                status,
                content_type,
                endpoint,
                preview,
            } => json!({
                "ok": false,
                "error": self.message(),
                "status": status,
                "contentType": content_type,
                "endpoint": endpoint,
                "preview": preview,
            }),
            Self::Status {
                status,
                error,
                endpoint,
            } => json!({
                "ok": false,
                "status": status,
                "error": error,
                "endpoint": endpoint,
            }),
        }
    }
}

/// Pooled client plus the read-only config it authenticates with.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    config: Arc<WorkerConfig>,
}

impl Upstream {
    pub fn new(config: Arc<WorkerConfig>) -> WorkerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .user_agent(concat!("quest-worker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run one statement. Transport failures and unparseable JSON bodies are
    /// errors; everything the database answered is a [`RunOutcome`].
    pub async fn run(&self, statement: &str, params: &Value) -> WorkerResult<RunOutcome> {
        let config = &self.config;
        let (Some(endpoint), Some(user), Some(password)) = (
            config.query_endpoint(),
            config.neo4j_user.as_deref(),
            config.neo4j_password.as_deref(),
        ) else {
            let missing = config.missing_secrets();
            warn!(?missing, "worker secrets missing");
            return Ok(RunOutcome::Failure(QueryFailure::MissingSecrets { missing }));
        };

        debug!(endpoint = %endpoint, "forwarding statement");
        let response = self
            .client
            .post(&endpoint)
            .basic_auth(user, Some(password))
            .header(ACCEPT, "application/json")
            .json(&json!({ "statement": statement, "parameters": params }))
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        if !content_type.contains("application/json") {
            warn!(status = status.as_u16(), content_type = %content_type, "upstream did not return JSON");
            return Ok(RunOutcome::Failure(QueryFailure::NotJson {
                status: status.as_u16(),
                content_type,
                endpoint,
                preview: text.chars().take(PREVIEW_CHARS).collect(),
            }));
        }

        let payload: Value = if text.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&text)?
        };

        if !status.is_success() {
            let error = upstream_error_message(&payload)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
            warn!(status = status.as_u16(), error = %error, "upstream rejected statement");
            return Ok(RunOutcome::Failure(QueryFailure::Status {
                status: status.as_u16(),
                error,
                endpoint,
            }));
        }

        Ok(RunOutcome::Success(QuerySuccess {
            status: status.as_u16(),
            endpoint,
            records: format_records(&payload),
            raw: payload,
        }))
    }
}

/// `errors[0].message`, else a string `error`.
fn upstream_error_message(payload: &Value) -> Option<String> {
    payload
        .pointer("/errors/0/message")
        .and_then(Value::as_str)
        .or_else(|| payload.get("error").and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(String::from)
}
