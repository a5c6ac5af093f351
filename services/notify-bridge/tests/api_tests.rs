//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use notify_bridge::Config;
use notify_bridge::api::{AppState, ErrorResponse, router};
use notify_bridge::config::{PlatformConfig, SigningConfig};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "api-test-secret";

struct TestApp {
    router: Router,
    bearer: String,
}

fn app(platform: PlatformConfig) -> TestApp {
    let config = Config::default()
        .with_signing(SigningConfig::default().with_secret(SECRET))
        .with_platform(platform);
    let state = AppState::from_config(&config).unwrap();
    let token = state
        .issuer
        .sign_internal("demo_user_alice", None)
        .unwrap()
        .token;
    TestApp {
        router: router(state),
        bearer: format!("Bearer {token}"),
    }
}

fn platform(server: &MockServer) -> PlatformConfig {
    PlatformConfig::default()
        .with_base_url(server.uri())
        .with_api_key("pk_test")
        .with_tenant_id("t1")
}

fn request(method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, bearer);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn error(body: Value) -> ErrorResponse {
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = app(PlatformConfig::default());
    let (status, body) = send(app.router, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "platform_configured": false}));
}

#[tokio::test]
async fn health_reports_configured_platform() {
    let app = app(PlatformConfig::default().with_api_key("pk_test"));
    let (_, body) = send(app.router, request(Method::GET, "/health", None, None)).await;
    assert_eq!(body["platform_configured"], true);
}

#[tokio::test]
async fn metrics_exposed_as_text() {
    let app = app(PlatformConfig::default());
    let response = app
        .router
        .oneshot(request(Method::GET, "/metrics", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn missing_bearer_is_unauthorized() {
    let app = app(PlatformConfig::default());
    let (status, body) =
        send(app.router, request(Method::GET, "/api/users/inbox-jwt", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error(body).error, "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn foreign_bearer_is_unauthorized() {
    let app = app(PlatformConfig::default());
    let other = bearer_signed_with("another-secret");
    let (status, _) = send(
        app.router,
        request(Method::GET, "/api/brands", Some(&other), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn bearer_signed_with(secret: &str) -> String {
    let config = Config::default().with_signing(SigningConfig::default().with_secret(secret));
    let state = AppState::from_config(&config).unwrap();
    let token = state.issuer.sign_internal("mallory", None).unwrap().token;
    format!("Bearer {token}")
}

#[tokio::test]
async fn inbox_jwt_returns_remote_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/issue-token"))
        .and(body_partial_json(json!({"tenant_id": "t1", "expires_in": "30 days"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "remote-inbox-token"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(Method::GET, "/api/users/inbox-jwt", Some(&app.bearer), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"credential": "remote-inbox-token", "subject": "demo_user_alice"})
    );
}

#[tokio::test]
async fn create_jwt_narrows_to_brand() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/issue-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "remote-create-token"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(
            Method::GET,
            "/api/users/create-jwt?brand_id=acme",
            Some(&app.bearer),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["credential"], "remote-create-token");

    let requests = server.received_requests().await.unwrap();
    let sent: Value = requests[0].body_json().unwrap();
    let scope = sent["scope"].as_str().unwrap();
    assert!(scope.split(' ').any(|s| s == "write:brands:acme"));
    assert!(scope.split(' ').any(|s| s == "user_id:demo_user_alice"));
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/issue-token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(Method::GET, "/api/users/inbox-jwt", Some(&app.bearer), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body = error(body);
    assert_eq!(body.error, "UPSTREAM_ERROR");
    assert!(body.message.contains("503"));
}

#[tokio::test]
async fn unconfigured_platform_is_server_error() {
    let app = app(PlatformConfig::default());
    let (status, body) = send(
        app.router,
        request(Method::GET, "/api/users/inbox-jwt", Some(&app.bearer), None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error(body).error, "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn profile_update_replaces_remote_profile() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/profiles/demo_user_alice"))
        .and(body_partial_json(json!({"profile": {"email": "alice@example.com"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(
            Method::PUT,
            "/api/users/profile",
            Some(&app.bearer),
            Some(json!({"email": "alice@example.com", "first_name": "Alice"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"subject": "demo_user_alice", "status": "updated"}));
}

#[tokio::test]
async fn send_message_returns_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_partial_json(json!({"message": {"to": {"user_id": "demo_user_bob"}}})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"requestId": "req-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(
            Method::POST,
            "/api/messaging/send",
            Some(&app.bearer),
            Some(json!({
                "recipient": "demo_user_bob",
                "template": "welcome-template",
                "data": {"first_name": "Bob"}
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message_id": "req-1", "status": "sent"}));
}

#[tokio::test]
async fn send_message_requires_template() {
    let app = app(PlatformConfig::default());
    let (status, body) = send(
        app.router,
        request(
            Method::POST,
            "/api/messaging/send",
            Some(&app.bearer),
            Some(json!({"recipient": "demo_user_bob", "data": {}})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error(body).message, "Missing required field: template");
}

#[tokio::test]
async fn create_template_requires_name() {
    let app = app(PlatformConfig::default());
    let (status, body) = send(
        app.router,
        request(
            Method::POST,
            "/api/templates",
            Some(&app.bearer),
            Some(json!({"subject": "Hi", "blocks": []})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = error(body);
    assert_eq!(body.error, "VALIDATION_ERROR");
    assert_eq!(body.message, "Missing required field: name");
}

#[tokio::test]
async fn create_template_is_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/templates"))
        .and(body_partial_json(json!({"name": "Welcome", "subject": "Hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"templateId": "tpl-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(
            Method::POST,
            "/api/templates",
            Some(&app.bearer),
            Some(json!({"name": "Welcome", "subject": "Hi", "blocks": [{"type": "text"}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"template_id": "tpl-1", "status": "created"}));
}

#[tokio::test]
async fn list_templates_counts_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants/t1/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "tpl-1"}, {"id": "tpl-2"}, {"id": "tpl-3"}]
        })))
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(Method::GET, "/api/templates", Some(&app.bearer), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["templates"][1]["id"], "tpl-2");
}

#[tokio::test]
async fn delete_template_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/templates/tpl-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(Method::DELETE, "/api/templates/tpl-1", Some(&app.bearer), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");
}

#[tokio::test]
async fn get_brand_wraps_brand() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brands/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "acme", "name": "Acme"})))
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(Method::GET, "/api/brands/acme", Some(&app.bearer), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brand"]["name"], "Acme");
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let app = app(PlatformConfig::default());
    let bearer = app.bearer.replacen("Bearer", "bearer", 1);
    let (status, body) = send(
        app.router,
        request(Method::GET, "/api/users/inbox-jwt", Some(&bearer), None),
    )
    .await;
    // Past authentication; fails only on the missing platform configuration.
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error(body).error, "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn other_auth_scheme_is_unauthorized() {
    let app = app(PlatformConfig::default());
    let basic = app.bearer.replacen("Bearer", "Basic", 1);
    let (status, _) = send(
        app.router,
        request(Method::GET, "/api/users/inbox-jwt", Some(&basic), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = app(PlatformConfig::default());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/messaging/send")
        .header(header::AUTHORIZATION, &app.bearer)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error(body).error, "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_content_type_uses_error_envelope() {
    let app = app(PlatformConfig::default());
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/users/profile")
        .header(header::AUTHORIZATION, &app.bearer)
        .body(Body::from(r#"{"email": "alice@example.com"}"#))
        .unwrap();
    let (status, body) = send(app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error(body).error, "VALIDATION_ERROR");
}

#[tokio::test]
async fn send_welcome_targets_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_partial_json(json!({"message": {
            "to": {"user_id": "demo_user_alice"},
            "template": "welcome-template",
            "data": {"first_name": "demo_user_alice", "email": "alice@example.com"}
        }})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"requestId": "req-welcome"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(
            Method::POST,
            "/api/messaging/send-welcome",
            Some(&app.bearer),
            Some(json!({"email": "alice@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message_id": "req-welcome", "status": "sent"}));
}

#[tokio::test]
async fn send_demo_picks_template_by_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_partial_json(json!({"message": {
            "to": {"user_id": "demo_user_alice"},
            "template": "shipping-update-template",
            "data": {"first_name": "Alice", "tracking_number": "TRK-67890"}
        }})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"requestId": "req-demo"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(
            Method::POST,
            "/api/messaging/send-demo",
            Some(&app.bearer),
            Some(json!({"type": "shipping_update", "first_name": "Alice"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message_id": "req-demo", "status": "sent", "type": "shipping_update"})
    );
}

#[tokio::test]
async fn send_demo_unknown_type_is_general() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_partial_json(json!({"message": {"template": "general-notification-template"}})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"requestId": "req-general"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(platform(&server));
    let (status, body) = send(
        app.router,
        request(
            Method::POST,
            "/api/messaging/send-demo",
            Some(&app.bearer),
            Some(json!({"type": "birthday"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "general");
}
