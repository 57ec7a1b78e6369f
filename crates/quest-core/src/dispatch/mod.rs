//! Query dispatcher: direct upstream, then worker variants, then mock data.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::mock::{MockCatalog, MockEntry};
use crate::normalize::normalize;
use crate::query::{NormalizedResult, Params, Query};
use crate::trace::DebugTrace;

mod endpoint;
mod helpers;
mod http;

pub use endpoint::{
    candidates, worker_urls, BodyBuilder, EndpointConfig, DIRECT_LABEL, WORKER_LABEL,
};

const USER_AGENT_VALUE: &str = concat!("quest-core/", env!("CARGO_PKG_VERSION"));

/// Runs queries against the configured endpoints in priority order.
///
/// Each call to [`Dispatcher::dispatch`] owns its trace; a dispatcher can be
/// shared between concurrent callers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    config: ClientConfig,
    catalog: MockCatalog,
}

impl Dispatcher {
    pub fn new(config: ClientConfig) -> DispatchResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // Per-attempt budgets are enforced in http.rs, not by the client.
        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| DispatchError::Client {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            catalog: MockCatalog::builtin(),
        })
    }

    pub fn from_env() -> DispatchResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Replace the mock catalog.
    pub fn with_catalog(mut self, catalog: MockCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MockCatalog {
        &self.catalog
    }

    /// Endpoint candidates in trial order.
    pub fn candidates(&self) -> Vec<EndpointConfig> {
        candidates(&self.config)
    }

    /// Build a [`Query`] and dispatch it.
    pub async fn run_cypher(
        &self,
        statement: &str,
        params: Params,
    ) -> DispatchResult<NormalizedResult> {
        let query = Query::new(statement, params)?;
        self.dispatch(&query).await
    }

    /// Try every candidate in order, falling back to the mock catalog.
    pub async fn dispatch(&self, query: &Query) -> DispatchResult<NormalizedResult> {
        if query.text().trim().is_empty() {
            return Err(DispatchError::InvalidQuery);
        }

        let mut trace = DebugTrace::default();
        let mut last_error = None;
        let mut empty_answer: Option<String> = None;

        for endpoint in self.candidates() {
            debug!(label = endpoint.label, url = %endpoint.url, "attempting endpoint");
            let (outcome, record) = http::attempt(&self.client, &endpoint, query).await;
            trace.push(record);

            match outcome {
                Ok(payload) => {
                    let rows = normalize(&payload);
                    if !rows.is_empty() {
                        info!(
                            label = endpoint.label,
                            url = %endpoint.url,
                            rows = rows.len(),
                            "query served"
                        );
                        return Ok(NormalizedResult {
                            rows,
                            mocked: false,
                            source_endpoint: Some(endpoint.url),
                            warning: None,
                            trace,
                        });
                    }

                    if let Some(entry) = self.catalog.lookup(query.text()) {
                        let warning = format!(
                            "{} returned no rows; showing mock data for this query",
                            endpoint.url
                        );
                        warn!(url = %endpoint.url, key = %entry.key, "backend returned empty records, using mock data");
                        return Ok(mocked(entry, Some(endpoint.url), Some(warning), trace));
                    }

                    debug!(url = %endpoint.url, "empty answer without mock entry, trying next candidate");
                    if empty_answer.is_none() {
                        empty_answer = Some(endpoint.url);
                    }
                }
                Err(kind) => {
                    warn!(
                        label = endpoint.label,
                        url = %endpoint.url,
                        error = %kind,
                        "endpoint attempt failed, trying next candidate if available"
                    );
                    last_error = Some(kind);
                }
            }
        }

        if let Some(entry) = self.catalog.lookup(query.text()) {
            warn!(key = %entry.key, attempts = trace.len(), "all endpoints failed, falling back to mock data");
            return Ok(mocked(entry, None, None, trace));
        }

        if let Some(url) = empty_answer {
            return Ok(NormalizedResult {
                rows: Vec::new(),
                mocked: false,
                source_endpoint: Some(url),
                warning: None,
                trace,
            });
        }

        Err(DispatchError::AllStrategiesExhausted { trace, last_error })
    }
}

fn mocked(
    entry: MockEntry,
    source_endpoint: Option<String>,
    warning: Option<String>,
    trace: DebugTrace,
) -> NormalizedResult {
    NormalizedResult {
        rows: entry.rows(),
        mocked: true,
        source_endpoint,
        warning,
        trace,
    }
}
