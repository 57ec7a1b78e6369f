//! HTTP layer: one bounded attempt against one endpoint.
//!
//! This is the ONLY place for status code handling. dispatch/mod.rs only
//! sees `Result<Value, FailureKind>` plus the attempt's record.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

use crate::error::FailureKind;
use crate::query::Query;
use crate::trace::AttemptRecord;

use super::endpoint::EndpointConfig;
use super::helpers::extract_error_message;

const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Outcome of one attempt; the record is returned whatever happened.
pub(crate) type Attempt = (Result<Value, FailureKind>, AttemptRecord);

/// Issue one POST, bounded by the endpoint's timeout.
///
/// When the timeout fires the in-flight request future is dropped, which
/// cancels the call.
pub(crate) async fn attempt(
    client: &reqwest::Client,
    endpoint: &EndpointConfig,
    query: &Query,
) -> Attempt {
    let body = endpoint.body.build(query);
    let mut record = AttemptRecord::new(
        endpoint.label,
        endpoint.url.as_str(),
        body.clone(),
        &endpoint.headers,
    );
    let started = Instant::now();

    let outcome = match tokio::time::timeout(
        endpoint.timeout,
        send(client, endpoint, &body, &mut record),
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(_) => Err(timeout_kind(endpoint.timeout)),
    };

    record.elapsed_ms = started.elapsed().as_millis() as u64;

    if let Err(kind) = &outcome {
        let message = match kind {
            FailureKind::Timeout { .. } => TIMEOUT_MESSAGE.to_string(),
            FailureKind::TransportFailure { message, .. }
            | FailureKind::UpstreamError { message, .. }
            | FailureKind::MalformedUpstreamResponse { message } => message.clone(),
        };
        record.fail(kind, message);
    }

    (outcome, record)
}

async fn send(
    client: &reqwest::Client,
    endpoint: &EndpointConfig,
    body: &Value,
    record: &mut AttemptRecord,
) -> Result<Value, FailureKind> {
    let mut request = client.post(&endpoint.url).json(body);
    for (name, value) in &endpoint.headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request
        .send()
        .await
        .map_err(|e| transport_kind(&e, endpoint.timeout))?;

    let status = response.status();
    record.status = Some(status.as_u16());
    record.status_text = status.canonical_reason().map(String::from);

    let text = response
        .text()
        .await
        .map_err(|e| transport_kind(&e, endpoint.timeout))?;
    let parsed = serde_json::from_str::<Value>(&text).ok();
    record.response_text = Some(text);
    record.response_json = parsed.clone();

    debug!(url = %endpoint.url, status = status.as_u16(), "endpoint responded");

    if !status.is_success() {
        return Err(FailureKind::UpstreamError {
            status: status.as_u16(),
            message: extract_error_message(parsed.as_ref()),
        });
    }

    parsed.ok_or_else(|| FailureKind::MalformedUpstreamResponse {
        message: "response body is not valid JSON".to_string(),
    })
}

fn timeout_kind(timeout: Duration) -> FailureKind {
    FailureKind::Timeout {
        timeout_ms: timeout.as_millis() as u64,
    }
}

/// No HTTP status was received: a network or CORS-level failure.
fn transport_kind(err: &reqwest::Error, timeout: Duration) -> FailureKind {
    if err.is_timeout() {
        return timeout_kind(timeout);
    }
    FailureKind::TransportFailure {
        message: err.to_string(),
        cors_likely: !err.is_status(),
    }
}
