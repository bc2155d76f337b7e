//! End-to-end tests for the authenticating client over real HTTP
//!
//! Covers:
//! - Token acquisition and memoization
//! - Refresh of an already-expired token
//! - Token endpoint failures
//! - Bearer-authorized resource requests

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use onelogin_sdk::oauth::DEFAULT_TOKEN_PATH;
use onelogin_sdk::{ClientConfig, Error, HttpClient, HttpRequest, OneLoginClient};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT_ID: &str = "cl13n71D";
const CLIENT_SECRET: &str = "cl13n7s3cr37";

fn token_info(access_token: &str, created_at: &str) -> Value {
    json!({
        "access_token": access_token,
        "created_at": created_at,
        "expires_in": 36000,
        "refresh_token": "8a1d0c",
        "token_type": "bearer",
        "account_id": 111_111
    })
}

fn client_for(server: &MockServer) -> OneLoginClient {
    let config = ClientConfig {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        region: None,
        base_url: Some(server.uri()),
        timeout: std::time::Duration::from_secs(3),
    };
    OneLoginClient::new(config).unwrap()
}

async fn mount_token(server: &MockServer, body: Value, times: u64) {
    Mock::given(method("POST"))
        .and(path(DEFAULT_TOKEN_PATH))
        .and(header(
            "Authorization",
            format!("Basic {}", STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}"))).as_str(),
        ))
        .and(body_json(json!({"grant_type": "client_credentials"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_gets_access_token() {
    let server = MockServer::start().await;
    mount_token(&server, token_info("valid token", &Utc::now().to_rfc3339()), 1).await;

    let client = client_for(&server);
    assert_eq!(client.get_access_token().await.unwrap(), "valid token");
    assert!(client.has_valid_token().await);
}

#[tokio::test]
async fn test_memoizes_valid_token() {
    let server = MockServer::start().await;
    mount_token(&server, token_info("valid token", &Utc::now().to_rfc3339()), 1).await;

    let client = client_for(&server);
    let first = client.get_access_token().await.unwrap();
    let second = client.get_access_token().await.unwrap();

    assert_eq!(first, second);
    // expect(1) is verified when the server drops
}

#[tokio::test]
async fn test_refreshes_expired_token() {
    let server = MockServer::start().await;
    mount_token(&server, token_info("expired token", "1975-11-06T03:53:41.981Z"), 1).await;

    let client = client_for(&server);
    assert_eq!(client.get_access_token().await.unwrap(), "expired token");

    mount_token(&server, token_info("valid token", &Utc::now().to_rfc3339()), 1).await;
    assert_eq!(client.get_access_token().await.unwrap(), "valid token");
}

#[tokio::test]
async fn test_token_endpoint_down() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DEFAULT_TOKEN_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_access_token().await.unwrap_err();

    assert!(matches!(err, Error::Authentication(_)));
    assert!(!client.has_valid_token().await);
}

#[tokio::test]
async fn test_token_endpoint_unreachable() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    drop(server);

    let err = client.get_access_token().await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
}

#[tokio::test]
async fn test_executes_successful_request() {
    let server = MockServer::start().await;
    mount_token(&server, token_info("valid token", &Utc::now().to_rfc3339()), 1).await;

    let app_info = json!({"name": "some app", "connector_id": 1234, "description": "For test"});
    Mock::given(method("POST"))
        .and(path("/api/2/apps"))
        .and(header("Authorization", "Bearer valid token"))
        .and(body_json(app_info.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(app_info.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .execute(HttpRequest::post("/api/2/apps").with_data(app_info.clone()))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.data, app_info);
}

#[tokio::test]
async fn test_handles_error_response() {
    let server = MockServer::start().await;
    mount_token(&server, token_info("valid token", &Utc::now().to_rfc3339()), 1).await;

    let bad_request = json!({
        "status": 400,
        "error": "BadRequestError",
        "description": "Invalid id(s): 1234"
    });
    Mock::given(method("POST"))
        .and(path("/api/2/apps"))
        .respond_with(ResponseTemplate::new(400).set_body_json(bad_request.clone()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .execute(HttpRequest::post("/api/2/apps").with_data(json!({"name": "some app"})))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    match err {
        Error::Request { body, status_text, .. } => {
            assert_eq!(body, bad_request);
            assert_eq!(status_text, "Bad Request");
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reuses_token_across_requests() {
    let server = MockServer::start().await;
    mount_token(&server, token_info("valid token", &Utc::now().to_rfc3339()), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/2/users"))
        .and(header("Authorization", "Bearer valid token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for _ in 0..3 {
        client.execute(HttpRequest::get("/api/2/users")).await.unwrap();
    }
}

#[tokio::test]
async fn test_empty_body_decodes_to_null() {
    let server = MockServer::start().await;
    mount_token(&server, token_info("valid token", &Utc::now().to_rfc3339()), 1).await;

    Mock::given(method("DELETE"))
        .and(path("/api/2/apps/9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .execute(HttpRequest::new(onelogin_sdk::Method::Delete, "/api/2/apps/9"))
        .await
        .unwrap();

    assert_eq!(response.status, 204);
    assert_eq!(response.data, Value::Null);
}

#[tokio::test]
async fn test_expired_token_is_never_sent() {
    let server = MockServer::start().await;
    mount_token(&server, token_info("expired token", "1975-11-06T03:53:41.981Z"), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/2/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.execute(HttpRequest::get("/api/2/apps")).await.unwrap_err();

    assert!(matches!(err, Error::Authentication(_)));
}
