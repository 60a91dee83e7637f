use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use auth_cell::handlers::{self, LoginRequest};
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn state_for(server: &MockServer) -> Arc<AppConfig> {
    Arc::new(TestConfig::with_url(&server.uri()).to_app_config())
}

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Authorization", format!("Bearer {}", token).parse().unwrap());
    headers
}

#[tokio::test]
async fn login_returns_the_session_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_partial_json(json!({ "email": "carlos@email.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "refresh_token": "refresh",
            "user": { "id": "user-1", "email": "carlos@email.com" }
        })))
        .mount(&server)
        .await;

    let response = handlers::login(
        State(state_for(&server)),
        Json(LoginRequest {
            email: "carlos@email.com".to_string(),
            password: "123456".to_string(),
        }),
    ).await.unwrap();

    assert_eq!(response.0["access_token"], json!("jwt-token"));
    assert_eq!(response.0["user"]["email"], json!("carlos@email.com"));
}

#[tokio::test]
async fn bad_credentials_surface_as_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let result = handlers::login(
        State(state_for(&server)),
        Json(LoginRequest {
            email: "carlos@email.com".to_string(),
            password: "wrong".to_string(),
        }),
    ).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn session_restore_accepts_a_valid_token() {
    let config = TestConfig::default();
    let user = TestUser::receptionist("maria@clinica.example");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(24));

    let response = handlers::validate_session(
        State(config.to_arc()),
        bearer_headers(&token),
    ).await.unwrap();

    assert!(response.0.valid);
    assert_eq!(response.0.user_id, user.id);
    assert_eq!(response.0.role, Some("receptionist".to_string()));
}

#[tokio::test]
async fn session_restore_rejects_expired_and_forged_tokens() {
    let config = TestConfig::default();
    let user = TestUser::patient("carlos@email.com");

    let expired = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);
    assert!(handlers::validate_session(
        State(config.to_arc()),
        bearer_headers(&expired),
    ).await.is_err());

    let forged = JwtTestUtils::create_invalid_signature_token(&user);
    assert!(handlers::validate_session(
        State(config.to_arc()),
        bearer_headers(&forged),
    ).await.is_err());

    assert!(handlers::validate_session(
        State(config.to_arc()),
        bearer_headers(&JwtTestUtils::create_malformed_token()),
    ).await.is_err());
}
