use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::services::sections::{sections_for_role, stat_cards_for_role};
use crate::services::stats::StatsService;

#[axum::debug_handler]
pub async fn get_dashboard_stats(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let stats_service = StatsService::new(&state);

    let stats = stats_service.dashboard_stats(auth.token())
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let role = user.role_or_default();
    let cards = stat_cards_for_role(role, &stats);

    Ok(Json(json!({
        "role": role,
        "stats": stats,
        "cards": cards
    })))
}

#[axum::debug_handler]
pub async fn get_sections(
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let role = user.role_or_default();

    Ok(Json(json!({
        "role": role,
        "sections": sections_for_role(role)
    })))
}
