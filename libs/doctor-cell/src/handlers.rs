use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::UpsertDoctorRequest;
use crate::services::{
    availability::SlotResolver,
    doctor::DoctorService,
    scheduling::candidate_dates,
};

/// Horizon used by the booking flow when none is given.
const DEFAULT_HORIZON_DAYS: u32 = 30;

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub search: Option<String>,
    pub speciality: Option<String>,
    pub active_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateDatesQuery {
    pub horizon_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let mut doctors = doctor_service
        .list_doctors(query.active_only.unwrap_or(true), auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if let Some(ref speciality) = query.speciality {
        doctors.retain(|doctor| doctor.speciality == *speciality);
    }
    if let Some(ref term) = query.search {
        doctors.retain(|doctor| doctor.matches_search(term));
    }

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(doctor_id, auth.token())
        .await
        .map_err(|_| AppError::NotFound("Doctor not found".to_string()))?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn upsert_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpsertDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.upsert_doctor(request, auth.token())
        .await
        .map_err(|e| {
            if e.downcast_ref::<crate::models::ScheduleError>().is_some() {
                AppError::Validation(e.to_string())
            } else {
                AppError::Internal(e.to_string())
            }
        })?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn deactivate_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    doctor_service.deactivate_doctor(doctor_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "deactivated": doctor_id })))
}

/// Dates within the horizon on which the doctor nominally works. An empty
/// list is a valid answer, not an error.
#[axum::debug_handler]
pub async fn get_candidate_dates(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<CandidateDatesQuery>,
) -> Result<Json<Value>, AppError> {
    let horizon_days = query.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS);
    if horizon_days == 0 {
        return Err(AppError::Validation("horizon_days must be greater than zero".to_string()));
    }

    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.get_doctor(doctor_id, auth.token())
        .await
        .map_err(|_| AppError::NotFound("Doctor not found".to_string()))?;

    let today = Utc::now().date_naive();
    let dates: Vec<NaiveDate> = candidate_dates(&doctor.schedules, horizon_days, today).collect();

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "dates": dates
    })))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let resolver = SlotResolver::new(&state);

    let slots = resolver.available_slots(doctor_id, query.date, auth.token())
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": query.date,
        "available_slots": slots
    })))
}
