//! Per-request CORS headers.
//!
//! Requests without an `Origin` (curl, server-to-server) get `*`. Browser
//! requests get their origin echoed when allowlisted, otherwise the first
//! allowlist entry; the browser then refuses the response on its own.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, VARY,
};
use axum::http::{HeaderMap, HeaderValue};

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const MAX_AGE: &str = "86400";
const ANY: &str = "*";

/// Origin to put in `Access-Control-Allow-Origin`.
pub fn allow_origin<'a>(origin: Option<&'a str>, allowlist: &'a [String]) -> &'a str {
    match origin.filter(|o| !o.is_empty()) {
        None => ANY,
        Some(origin) if allowlist.iter().any(|a| a == origin) => origin,
        Some(_) => allowlist.first().map(String::as_str).unwrap_or(ANY),
    }
}

/// Headers attached to every response, success or error.
pub fn cors_headers(origin: Option<&str>, allowlist: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let allow = allow_origin(origin, allowlist);
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_str(allow).unwrap_or_else(|_| HeaderValue::from_static(ANY)),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
    if origin.is_some_and(|o| !o.is_empty()) {
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }
    headers
}
