//! Attempt recorder: one [`AttemptRecord`] per outbound call.
//!
//! Records are built by the attempt that made the call and handed back to the
//! dispatcher, which appends them to its own [`DebugTrace`]. Nothing else
//! holds a reference to the trace while a dispatch is running.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::FailureKind;

/// Header names whose values never enter a trace (case-insensitive).
pub const SENSITIVE_HEADER_NAMES: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "x-api-key",
    "cookie",
    "set-cookie",
    "x-auth-token",
];

const REDACTED: &str = "[redacted]";

/// Response text beyond this many characters is elided when rendered.
pub const RENDER_TRUNCATE_CHARS: usize = 600;

/// Returns true if the header name is sensitive.
pub fn is_sensitive(name: &str) -> bool {
    SENSITIVE_HEADER_NAMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name))
}

/// Copy headers for a trace, replacing sensitive values.
pub fn redact_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| {
            if is_sensitive(k) {
                (k.clone(), REDACTED.to_string())
            } else {
                (k.clone(), v.clone())
            }
        })
        .collect()
}

/// Diagnostic record of one outbound call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptRecord {
    pub label: String,
    pub url: String,
    pub request_body: Value,
    pub request_headers: Vec<(String, String)>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_json: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    pub cors_likely: bool,
}

impl AttemptRecord {
    pub fn new(
        label: impl Into<String>,
        url: impl Into<String>,
        request_body: Value,
        request_headers: &[(String, String)],
    ) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            request_body,
            request_headers: redact_headers(request_headers),
            started_at: Utc::now(),
            elapsed_ms: 0,
            status: None,
            status_text: None,
            response_text: None,
            response_json: None,
            error: None,
            failure: None,
            cors_likely: false,
        }
    }

    /// Mark the record failed with the given kind.
    pub fn fail(&mut self, kind: &FailureKind, message: impl Into<String>) {
        if let FailureKind::TransportFailure { cors_likely, .. } = kind {
            self.cors_likely = *cors_likely;
        }
        self.error = Some(message.into());
        self.failure = Some(kind.clone());
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// One-line summary: label plus status or error.
    pub fn summary(&self) -> String {
        let outcome = match (self.status, &self.error) {
            (Some(status), _) => status.to_string(),
            (None, Some(error)) => error.clone(),
            (None, None) => "pending".to_string(),
        };
        format!("{} · {}", self.label, outcome)
    }
}

/// Ordered attempt log owned by a single dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DebugTrace {
    attempts: Vec<AttemptRecord>,
}

impl DebugTrace {
    pub fn push(&mut self, record: AttemptRecord) {
        self.attempts.push(record);
    }

    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn last(&self) -> Option<&AttemptRecord> {
        self.attempts.last()
    }

    /// Human-readable report of every attempt.
    pub fn render(&self) -> String {
        if self.attempts.is_empty() {
            return "no requests recorded\n".to_string();
        }

        let mut out = String::new();
        for (idx, attempt) in self.attempts.iter().enumerate() {
            let _ = writeln!(out, "#{} {}", idx + 1, attempt.summary());
            let _ = writeln!(out, "  url:    {}", attempt.url);
            let body = serde_json::to_string(&attempt.request_body).unwrap_or_default();
            let _ = writeln!(out, "  body:   {body}");
            let status = match attempt.status {
                Some(status) => format!(
                    "{} {}",
                    status,
                    attempt.status_text.as_deref().unwrap_or_default()
                )
                .trim_end()
                .to_string(),
                None => "no response".to_string(),
            };
            let _ = writeln!(out, "  status: {status}");
            let text = attempt
                .response_text
                .as_deref()
                .map(truncate)
                .unwrap_or_else(|| "(none)".to_string());
            let _ = writeln!(out, "  response: {text}");
            let _ = writeln!(out, "  elapsed: {}ms", attempt.elapsed_ms);
            if let Some(error) = &attempt.error {
                let _ = writeln!(out, "  error:  {error}");
            }
            if attempt.cors_likely {
                let _ = writeln!(out, "  note:   possible CORS or network problem");
            }
        }
        out
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > RENDER_TRUNCATE_CHARS {
        let head: String = text.chars().take(RENDER_TRUNCATE_CHARS).collect();
        format!("{head}…")
    } else {
        text.to_string()
    }
}
