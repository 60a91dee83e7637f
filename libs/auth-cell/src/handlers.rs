use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

/// Password login. On success the caller receives the session token it will
/// persist locally and send back as a Bearer header from then on.
#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Login attempt for {}", request.email);

    let client = SupabaseClient::new(&config);
    let session = client.sign_in_with_password(&request.email, &request.password)
        .await
        .map_err(|_| AppError::Auth("Invalid credentials".to_string()))?;

    info!("User {} logged in", request.email);

    Ok(Json(json!({
        "access_token": session["access_token"],
        "refresh_token": session["refresh_token"],
        "user": session["user"],
    })))
}

/// Restores a session from a persisted token: validates signature and
/// expiry locally and echoes the user identity back.
#[axum::debug_handler]
pub async fn validate_session(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating session token");

    let token = extract_bearer_token(&headers)?;

    match jwt::validate_token(&token, &config.supabase_jwt_secret) {
        Ok(user) => Ok(Json(TokenResponse {
            valid: true,
            user_id: user.id,
            email: user.email,
            role: user.role,
        })),
        Err(err) => Err(AppError::Auth(err)),
    }
}

/// Ends the session: the upstream token is revoked and the caller drops its
/// persisted copy.
#[axum::debug_handler]
pub async fn logout(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = extract_bearer_token(&headers)?;

    let client = SupabaseClient::new(&config);
    client.sign_out(&token)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    info!("User {} logged out", user.id);

    Ok(Json(json!({ "logged_out": true })))
}
