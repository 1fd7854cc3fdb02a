use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use claimgate::{
    app::build_router,
    services::{
        DecisionService,
        access::{FailureMode, RemoteAccessEvaluator, ReqwestTransport},
        claims::{DefaultClaimMapper, ReleaseEngine, StaticSupportedClaims},
        registry::InMemoryServiceRegistry,
    },
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn router(endpoint_url: &str, failure_mode: FailureMode) -> Router {
    let document = json!({
        "services": [
            {
                "serviceId": "portal",
                "accessStrategy": {
                    "@type": "RemoteEndpoint",
                    "endpointUrl": endpoint_url,
                    "acceptableResponseCodes": "200,202"
                },
                "attributeReleasePolicy": {
                    "@type": "OidcScope",
                    "scopeType": "custom",
                    "allowedAttributes": ["groups", "email"],
                    "claimMappings": {"email": "mail"}
                }
            },
            {"serviceId": "wiki"}
        ]
    })
    .to_string();

    let registry = InMemoryServiceRegistry::from_json(&document).unwrap();
    let release = ReleaseEngine::new(
        Arc::new(DefaultClaimMapper::default()),
        Arc::new(StaticSupportedClaims::new(
            ["email", "groups", "sub"].into_iter().collect(),
        )),
    );
    let access = RemoteAccessEvaluator::new(Arc::new(
        ReqwestTransport::new(Duration::from_secs(2)).unwrap(),
    ));
    let decisions = DecisionService::new(Arc::new(registry), release, access, failure_mode);

    build_router(AppState::new(decisions), Duration::from_secs(10))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn remote_endpoint(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/check"))
        .and(matchers::query_param("username", "casuser"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(
        router("http://127.0.0.1:1/check", FailureMode::Propagate),
        Request::get("/api/v1/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"status": "ok"}));
}

#[tokio::test]
async fn accepted_status_allows_access() {
    let server = remote_endpoint(202).await;

    let (status, body) = send(
        router(&format!("{}/check", server.uri()), FailureMode::Propagate),
        post_json("/api/v1/services/portal/access", json!({"principalId": "casuser"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"allowed": true}));
}

#[tokio::test]
async fn rejected_status_denies_access() {
    let server = remote_endpoint(403).await;

    let (status, body) = send(
        router(&format!("{}/check", server.uri()), FailureMode::Propagate),
        post_json("/api/v1/services/portal/access", json!({"principalId": "casuser"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"allowed": false}));
}

#[tokio::test]
async fn probe_failure_is_distinguishable_from_deny() {
    let (status, body) = send(
        router("http://127.0.0.1:1/check", FailureMode::Propagate),
        post_json("/api/v1/services/portal/access", json!({"principalId": "casuser"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["code"], "ACCESS_EVALUATION_FAILED");
}

#[tokio::test]
async fn probe_failure_denies_when_failing_closed() {
    let (status, body) = send(
        router("http://127.0.0.1:1/check", FailureMode::Deny),
        post_json("/api/v1/services/portal/access", json!({"principalId": "casuser"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"allowed": false}));
}

#[tokio::test]
async fn service_without_strategy_is_open() {
    let (status, body) = send(
        router("http://127.0.0.1:1/check", FailureMode::Propagate),
        post_json("/api/v1/services/wiki/access", json!({"principalId": "casuser"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"allowed": true}));
}

#[tokio::test]
async fn unknown_service_is_not_found() {
    let (status, _) = send(
        router("http://127.0.0.1:1/check", FailureMode::Propagate),
        post_json("/api/v1/services/nope/access", json!({"principalId": "casuser"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_principal_is_rejected() {
    let (status, body) = send(
        router("http://127.0.0.1:1/check", FailureMode::Propagate),
        post_json("/api/v1/services/portal/access", json!({"principalId": "  "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["code"], "INVALID_ACCESS_REQUEST");
}

#[tokio::test]
async fn release_maps_claims_in_policy_order() {
    let (status, body) = send(
        router("http://127.0.0.1:1/check", FailureMode::Propagate),
        post_json(
            "/api/v1/services/portal/release",
            json!({"attributes": {"Mail": ["a@b.com"], "groups": ["admins"], "uid": "casuser"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"claims":{"groups":["admins"],"email":["a@b.com"]}}"#
    );
}

#[tokio::test]
async fn release_omits_unresolvable_mapping() {
    let (status, body) = send(
        router("http://127.0.0.1:1/check", FailureMode::Propagate),
        post_json(
            "/api/v1/services/portal/release",
            json!({"attributes": {"groups": ["admins"]}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"claims":{"groups":["admins"]}}"#);
}

#[tokio::test]
async fn requested_claims_lists_policy_claims() {
    let router = router("http://127.0.0.1:1/check", FailureMode::Propagate);

    let (status, body) = send(
        router.clone(),
        Request::get("/api/v1/services/portal/requested-claims")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"claims": ["groups", "email"]})
    );

    let (status, body) = send(
        router,
        Request::get("/api/v1/services/wiki/requested-claims")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"claims": []}));
}
