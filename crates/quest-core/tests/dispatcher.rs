//! Integration tests for Dispatcher.
//!
//! Uses wiremock for the worker and direct upstream. Tests cover candidate
//! order, empty-result mock substitution, failover on status/transport/timeout
//! failures, and the exhaustion error.

use std::time::Duration;

use quest_core::{
    ClientConfig, DirectConfig, DispatchError, Dispatcher, FailureKind, Params, Query,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn worker_config(mock_server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_worker_url(format!("{}/run", mock_server.uri()))
        .with_timeouts(Duration::from_millis(500), Duration::from_millis(250))
}

fn dispatcher(config: ClientConfig) -> Dispatcher {
    Dispatcher::new(config).expect("failed to create dispatcher")
}

#[tokio::test]
async fn test_worker_rows_are_served_live() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/run"))
        .and(body_partial_json(json!({"cypher": "MATCH (m:Movie) RETURN m.title AS title"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"title": "The Matrix"}, {"title": "Heat"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = dispatcher(worker_config(&mock_server))
        .run_cypher("MATCH (m:Movie) RETURN m.title AS title", Params::new())
        .await
        .expect("dispatch failed");

    assert!(!result.mocked);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0]["title"], "The Matrix");
    assert_eq!(
        result.source_endpoint,
        Some(format!("{}/run", mock_server.uri()))
    );
    assert_eq!(result.trace.len(), 1);
    assert_eq!(result.trace.attempts()[0].status, Some(200));
    assert!(result.warning.is_none());
}

#[tokio::test]
async fn test_empty_records_for_catalog_query_uses_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = dispatcher(worker_config(&mock_server))
        .run_cypher("RETURN 1 AS one", Params::new())
        .await
        .expect("dispatch failed");

    assert!(result.mocked);
    assert_eq!(result.rows[0]["one"], 1);
    assert_eq!(result.trace.len(), 1);
    assert!(result.trace.attempts()[0].succeeded());
    assert!(result.warning.is_some());
}

#[tokio::test]
async fn test_empty_records_without_mock_tries_next_candidate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"title": "Heat"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = dispatcher(worker_config(&mock_server))
        .run_cypher("MATCH (m:Movie) RETURN m.title AS title", Params::new())
        .await
        .expect("dispatch failed");

    assert!(!result.mocked);
    assert_eq!(result.rows[0]["title"], "Heat");
    assert_eq!(result.source_endpoint, Some(mock_server.uri()));
    assert_eq!(result.trace.len(), 2);
}

#[tokio::test]
async fn test_empty_everywhere_without_mock_returns_empty_live_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let result = dispatcher(worker_config(&mock_server))
        .run_cypher("MATCH (m:Movie) RETURN m.title AS title", Params::new())
        .await
        .expect("empty live answer is not an error");

    assert!(!result.mocked);
    assert!(result.rows.is_empty());
    assert_eq!(result.source_endpoint, Some(format!("{}/run", mock_server.uri())));
    assert_eq!(result.trace.len(), 2);
}

#[tokio::test]
async fn test_server_errors_fall_back_to_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "ok": false,
            "error": "Neo4j did not return JSON"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let result = dispatcher(worker_config(&mock_server))
        .run_cypher("MATCH (u:User) RETURN u LIMIT 20", Params::new())
        .await
        .expect("dispatch failed");

    assert!(result.mocked);
    assert_eq!(result.rows.len(), 5);
    assert!(result.source_endpoint.is_none());
    assert_eq!(result.trace.len(), 2);
    for attempt in result.trace.attempts() {
        assert_eq!(attempt.status, Some(500));
        assert_eq!(attempt.error.as_deref(), Some("Neo4j did not return JSON"));
        assert!(!attempt.cors_likely);
    }
}

#[tokio::test]
async fn test_exhaustion_carries_trace() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let err = dispatcher(worker_config(&mock_server))
        .run_cypher("MATCH (m:Movie) RETURN m.title", Params::new())
        .await
        .unwrap_err();

    match err {
        DispatchError::AllStrategiesExhausted { trace, last_error } => {
            assert_eq!(trace.len(), 2);
            assert_eq!(trace.attempts()[0].response_text.as_deref(), Some("bad gateway"));
            assert_eq!(trace.attempts()[0].error.as_deref(), Some("Request failed"));
            assert_eq!(
                last_error,
                Some(FailureKind::UpstreamError {
                    status: 502,
                    message: "Request failed".to_string()
                })
            );
        }
        other => panic!("expected AllStrategiesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_recorded_as_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"records": [{"x": 1}]}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = ClientConfig::default()
        .with_worker_url(format!("{}/run", mock_server.uri()))
        .with_timeouts(Duration::from_millis(100), Duration::from_millis(100));

    let err = dispatcher(config)
        .run_cypher("MATCH (m:Movie) RETURN m.title", Params::new())
        .await
        .unwrap_err();

    let trace = err.trace().expect("trace");
    assert_eq!(trace.len(), 2);
    for attempt in trace.attempts() {
        assert_eq!(attempt.error.as_deref(), Some("Request timed out"));
        assert_eq!(attempt.failure, Some(FailureKind::Timeout { timeout_ms: 100 }));
        assert!(attempt.status.is_none());
        assert!(!attempt.cors_likely);
        assert!(attempt.elapsed_ms < 2000);
    }
}

#[tokio::test]
async fn test_transport_failure_is_cors_likely_and_mock_backs_it() {
    // Nothing listens on port 9; connection is refused.
    let config = ClientConfig::default()
        .with_worker_url("http://127.0.0.1:9/run")
        .with_timeouts(Duration::from_millis(500), Duration::from_millis(500));

    let result = dispatcher(config)
        .run_cypher("MATCH (n) RETURN labels(n) AS labels, count(*) AS cnt ORDER BY cnt DESC LIMIT 20", Params::new())
        .await
        .expect("mock fallback");

    assert!(result.mocked);
    assert_eq!(result.rows.len(), 3);
    assert_eq!(result.trace.len(), 2);
    assert_eq!(result.trace.attempts()[0].url, "http://127.0.0.1:9/run");
    assert_eq!(result.trace.attempts()[1].url, "http://127.0.0.1:9");
    for attempt in result.trace.attempts() {
        assert!(attempt.cors_likely);
        assert!(matches!(
            attempt.failure,
            Some(FailureKind::TransportFailure { cors_likely: true, .. })
        ));
    }
}

#[tokio::test]
async fn test_direct_upstream_is_tried_first() {
    let direct = MockServer::start().await;
    let worker = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/db/neo4j/query"))
        .and(header("authorization", "Basic bmVvNGo6c2VjcmV0"))
        .and(body_partial_json(json!({
            "query": "MATCH (p:Person) RETURN p.name AS name, p.age AS age",
            "parameters": {"min": 18},
            "database": "neo4j"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"keys": ["name", "age"], "_fields": ["Alice", 30]}]
        })))
        .expect(1)
        .mount(&direct)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": [{"x": 1}]})))
        .expect(0)
        .mount(&worker)
        .await;

    let config = worker_config(&worker).with_direct(DirectConfig {
        endpoint: format!("{}/db/neo4j/query", direct.uri()),
        username: "neo4j".into(),
        password: "secret".into(),
        database: "neo4j".into(),
    });

    let mut params = Params::new();
    params.insert("min".into(), json!(18));
    let query = Query::new("MATCH (p:Person) RETURN p.name AS name, p.age AS age", params).unwrap();

    let result = dispatcher(config).dispatch(&query).await.expect("dispatch failed");

    assert!(!result.mocked);
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0]["name"], "Alice");
    assert_eq!(result.rows[0]["age"], 30);
    assert_eq!(result.trace.len(), 1);
    assert_eq!(result.trace.attempts()[0].label, "direct");
    // Credentials never reach the trace.
    assert!(result.trace.attempts()[0]
        .request_headers
        .iter()
        .all(|(_, v)| !v.contains("bmVvNGo6c2VjcmV0")));
}

#[tokio::test]
async fn test_direct_failure_falls_through_to_worker() {
    let direct = MockServer::start().await;
    let worker = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "The client is unauthorized due to authentication failure."}
        })))
        .expect(1)
        .mount(&direct)
        .await;

    Mock::given(method("POST"))
        .and(path("/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": [{"n": 1}]})))
        .expect(1)
        .mount(&worker)
        .await;

    let config = worker_config(&worker).with_direct(DirectConfig {
        endpoint: direct.uri(),
        username: "neo4j".into(),
        password: "wrong".into(),
        database: "neo4j".into(),
    });

    let result = dispatcher(config)
        .run_cypher("MATCH (n) RETURN 1 AS n", Params::new())
        .await
        .expect("dispatch failed");

    assert!(!result.mocked);
    assert_eq!(result.trace.len(), 2);
    let first = &result.trace.attempts()[0];
    assert_eq!(first.label, "direct");
    assert_eq!(first.status, Some(401));
    assert_eq!(
        first.error.as_deref(),
        Some("The client is unauthorized due to authentication failure.")
    );
    assert_eq!(result.trace.attempts()[1].label, "worker");
}

#[tokio::test]
async fn test_non_json_success_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/run"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": [{"ok": true}]})))
        .mount(&mock_server)
        .await;

    let result = dispatcher(worker_config(&mock_server))
        .run_cypher("MATCH (n) RETURN true AS ok", Params::new())
        .await
        .expect("dispatch failed");

    let first = &result.trace.attempts()[0];
    assert!(matches!(
        first.failure,
        Some(FailureKind::MalformedUpstreamResponse { .. })
    ));
    assert_eq!(first.response_text.as_deref(), Some("<html>login</html>"));
    assert!(first.response_json.is_none());
    assert_eq!(result.rows[0]["ok"], true);
}

#[tokio::test]
async fn test_trial_order_is_stable_across_invocations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher(worker_config(&mock_server));
    let mut orders = Vec::new();
    for _ in 0..3 {
        let err = dispatcher
            .run_cypher("MATCH (m:Movie) RETURN m", Params::new())
            .await
            .unwrap_err();
        let urls: Vec<String> = err
            .trace()
            .unwrap()
            .attempts()
            .iter()
            .map(|a| a.url.clone())
            .collect();
        orders.push(urls);
    }

    assert_eq!(orders[0].len(), 2);
    assert!(orders.iter().all(|o| o == &orders[0]));
}
