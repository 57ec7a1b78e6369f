//! Endpoint candidates and their wire bodies.

use std::time::Duration;

use base64::Engine;
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::query::Query;

/// Wire protocol of an endpoint; decides the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyBuilder {
    /// Graph database query API: `{query, parameters, database}`.
    Direct { database: String },
    /// Guard worker: `{cypher, params}`.
    Worker,
}

impl BodyBuilder {
    pub fn build(&self, query: &Query) -> Value {
        match self {
            Self::Direct { database } => json!({
                "query": query.text(),
                "parameters": query.params(),
                "database": database,
            }),
            Self::Worker => json!({
                "cypher": query.text(),
                "params": query.params(),
            }),
        }
    }
}

/// One candidate endpoint for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub label: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: BodyBuilder,
    pub timeout: Duration,
}

pub const DIRECT_LABEL: &str = "direct";
pub const WORKER_LABEL: &str = "worker";

const RUN_SUFFIX: &str = "/run";

/// Candidates in trial order: direct (if configured), then worker variants.
pub fn candidates(config: &ClientConfig) -> Vec<EndpointConfig> {
    let mut out = Vec::new();

    if let Some(direct) = &config.direct {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", direct.username, direct.password));
        out.push(EndpointConfig {
            label: DIRECT_LABEL,
            url: direct.endpoint.clone(),
            headers: vec![("Authorization".to_string(), format!("Basic {token}"))],
            body: BodyBuilder::Direct {
                database: direct.database.clone(),
            },
            timeout: config.direct_timeout(),
        });
    }

    for url in worker_urls(&config.worker_url) {
        out.push(EndpointConfig {
            label: WORKER_LABEL,
            url,
            headers: Vec::new(),
            body: BodyBuilder::Worker,
            timeout: config.worker_timeout(),
        });
    }

    out
}

/// The configured worker URL plus its sibling with `/run` toggled.
pub fn worker_urls(worker_url: &str) -> Vec<String> {
    let sibling = match worker_url.strip_suffix(RUN_SUFFIX) {
        Some(base) => base.to_string(),
        None => format!("{}{}", worker_url.strip_suffix('/').unwrap_or(worker_url), RUN_SUFFIX),
    };

    let mut urls = vec![worker_url.to_string()];
    if !urls.contains(&sibling) {
        urls.push(sibling);
    }
    urls
}
