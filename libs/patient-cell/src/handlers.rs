use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::services::directory::PatientService;

#[derive(Debug, Deserialize)]
pub struct PatientListQuery {
    pub search: Option<String>,
    pub active_only: Option<bool>,
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Value>, AppError> {
    let patient_service = PatientService::new(&state);

    let mut patients = patient_service
        .list_patients(query.active_only.unwrap_or(true), auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if let Some(ref term) = query.search {
        patients.retain(|patient| patient.matches_search(term));
    }

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}
