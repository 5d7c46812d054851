//! Shared helpers for the wiremock integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use dealership_integration::{
    client_config, BackendVersion, ClientMetrics, DealershipClient, InMemoryMetrics,
    RecordingNavigator, ReqwestHttpTransport, TokenStore,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// Client wired to a mock server, with handles on its collaborators.
pub struct Harness {
    pub server: MockServer,
    pub client: DealershipClient,
    pub tokens: Arc<TokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub metrics: Arc<InMemoryMetrics>,
}

pub async fn harness(version: BackendVersion) -> Harness {
    harness_with_tokens(version, Arc::new(TokenStore::in_memory())).await
}

pub async fn harness_with_tokens(version: BackendVersion, tokens: Arc<TokenStore>) -> Harness {
    let server = MockServer::start().await;
    let config = client_config()
        .base_url(server.uri())
        .backend_version(version)
        .build()
        .unwrap();

    let navigator = Arc::new(RecordingNavigator::new());
    let metrics = Arc::new(InMemoryMetrics::new());
    let client = DealershipClient::from_shared(
        config,
        Arc::new(ReqwestHttpTransport::new().unwrap()),
        tokens.clone(),
        navigator.clone(),
        Some(metrics.clone() as Arc<dyn ClientMetrics>),
    );

    Harness {
        server,
        client,
        tokens,
        navigator,
        metrics,
    }
}

/// Success envelope around `payload`.
pub fn envelope(payload: Value) -> Value {
    json!({"status": 200, "payload": payload, "errorMessage": null})
}

pub fn success_response(payload: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(payload))
}

pub fn error_response(status: u16, message: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "status": status,
        "exception": {
            "path": "/",
            "createTime": "2024-01-01T00:00:00",
            "hostName": "backend",
            "message": message
        }
    }))
}

/// Matcher for a request carrying `token` as bearer.
pub fn mock_with_auth(method_name: &str, route: &str, token: &str) -> MockBuilder {
    Mock::given(method(method_name))
        .and(path(route))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
}
