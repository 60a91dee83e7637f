use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use doctor_cell::services::{availability::SlotResolver, doctor::DoctorService};
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AppointmentType, WizardError};
use crate::services::booking::{BookingService, WizardStore};
use crate::services::wizard::BookingWizard;

#[derive(Debug, Deserialize)]
pub struct ChooseSpecialtyRequest {
    pub specialty: String,
}

#[derive(Debug, Deserialize)]
pub struct ChooseDoctorRequest {
    pub doctor_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChooseDateRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ChooseTimeRequest {
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingDetailsRequest {
    pub appointment_type: Option<AppointmentType>,
    pub notes: Option<String>,
}

fn wizard_error(err: WizardError) -> AppError {
    match err {
        WizardError::SubmitInFlight | WizardError::AlreadySubmitted => {
            AppError::Conflict(err.to_string())
        }
        _ => AppError::Validation(err.to_string()),
    }
}

fn no_wizard() -> AppError {
    AppError::NotFound("No booking in progress".to_string())
}

fn snapshot(wizard: &BookingWizard) -> Value {
    json!({
        "step": wizard.step(),
        "specialty": wizard.specialty(),
        "doctor": wizard.doctor().map(|d| json!({
            "id": d.id,
            "full_name": d.full_name,
            "speciality": d.speciality,
        })),
        "candidate_dates": wizard.candidate_dates(),
        "date": wizard.date(),
        "available_slots": wizard.available_slots(),
        "time": wizard.time(),
        "appointment_type": wizard.appointment_type(),
        "notes": wizard.notes(),
        "submit_in_flight": wizard.submit_in_flight(),
        "confirmation": wizard.confirmation(),
        "error": wizard.last_error(),
    })
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointments = booking_service.list_appointments(auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn start_wizard(
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
) -> Result<Json<Value>, AppError> {
    debug!("Starting booking wizard for user {}", user.id);

    let wizard = BookingWizard::new(Utc::now().date_naive());
    let view = snapshot(&wizard);
    store.start(&user.id, wizard).await;

    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn get_wizard(
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
) -> Result<Json<Value>, AppError> {
    let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
    Ok(Json(snapshot(&wizard)))
}

#[axum::debug_handler]
pub async fn choose_specialty(
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
    Json(request): Json<ChooseSpecialtyRequest>,
) -> Result<Json<Value>, AppError> {
    store
        .with_wizard(&user.id, |wizard| wizard.choose_specialty(&request.specialty))
        .await
        .ok_or_else(no_wizard)?
        .map_err(wizard_error)?;

    let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
    Ok(Json(snapshot(&wizard)))
}

#[axum::debug_handler]
pub async fn choose_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
    Json(request): Json<ChooseDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.get_doctor(request.doctor_id, auth.token())
        .await
        .map_err(|_| AppError::NotFound("Doctor not found".to_string()))?;

    store
        .with_wizard(&user.id, |wizard| wizard.choose_doctor(doctor))
        .await
        .ok_or_else(no_wizard)?
        .map_err(wizard_error)?;

    let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
    Ok(Json(snapshot(&wizard)))
}

/// Sets the date, then fetches the slot list for the new selection. The
/// epoch captured under the lock makes a racing change win: if the
/// selection moved on while the fetch was in flight, the stale result is
/// dropped on installation.
#[axum::debug_handler]
pub async fn choose_date(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
    Json(request): Json<ChooseDateRequest>,
) -> Result<Json<Value>, AppError> {
    let (epoch, doctor_id) = store
        .with_wizard(&user.id, |wizard| {
            wizard.choose_date(request.date)?;
            let doctor_id = wizard.doctor().map(|d| d.id).ok_or(WizardError::DoctorNotChosen)?;
            Ok::<_, WizardError>((wizard.slot_epoch(), doctor_id))
        })
        .await
        .ok_or_else(no_wizard)?
        .map_err(wizard_error)?;

    fetch_and_install_slots(&state, &store, &user.id, doctor_id, request.date, epoch, auth.token()).await?;

    let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
    Ok(Json(snapshot(&wizard)))
}

/// Re-fetches slots for the current selection, e.g. after a transient
/// remote failure. No automatic retry happens anywhere else.
#[axum::debug_handler]
pub async fn reload_slots(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
) -> Result<Json<Value>, AppError> {
    let (epoch, doctor_id, date) = store
        .with_wizard(&user.id, |wizard| {
            let doctor_id = wizard.doctor().map(|d| d.id).ok_or(WizardError::DoctorNotChosen)?;
            let date = wizard.date().ok_or(WizardError::DateNotChosen)?;
            Ok::<_, WizardError>((wizard.slot_epoch(), doctor_id, date))
        })
        .await
        .ok_or_else(no_wizard)?
        .map_err(wizard_error)?;

    fetch_and_install_slots(&state, &store, &user.id, doctor_id, date, epoch, auth.token()).await?;

    let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
    Ok(Json(snapshot(&wizard)))
}

#[axum::debug_handler]
pub async fn choose_time(
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
    Json(request): Json<ChooseTimeRequest>,
) -> Result<Json<Value>, AppError> {
    store
        .with_wizard(&user.id, |wizard| wizard.choose_time(&request.time))
        .await
        .ok_or_else(no_wizard)?
        .map_err(wizard_error)?;

    let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
    Ok(Json(snapshot(&wizard)))
}

#[axum::debug_handler]
pub async fn set_details(
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
    Json(request): Json<BookingDetailsRequest>,
) -> Result<Json<Value>, AppError> {
    store
        .with_wizard(&user.id, |wizard| {
            if let Some(appointment_type) = request.appointment_type {
                wizard.set_appointment_type(appointment_type)?;
            }
            if let Some(ref notes) = request.notes {
                wizard.set_notes(notes)?;
            }
            Ok::<_, WizardError>(())
        })
        .await
        .ok_or_else(no_wizard)?
        .map_err(wizard_error)?;

    let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
    Ok(Json(snapshot(&wizard)))
}

/// Submits the booking. Exactly one request may be outstanding per wizard;
/// on failure the wizard stays in Confirm and the user may resubmit.
#[axum::debug_handler]
pub async fn submit_wizard(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
) -> Result<Json<Value>, AppError> {
    let request = store
        .with_wizard(&user.id, |wizard| wizard.begin_submit())
        .await
        .ok_or_else(no_wizard)?
        .map_err(wizard_error)?;

    let booking_service = BookingService::new(&state);
    let outcome = booking_service
        .create_appointment(&user.id, request, auth.token())
        .await;

    match outcome {
        Ok(appointment) => {
            store
                .with_wizard(&user.id, |wizard| wizard.complete_submit(appointment.id))
                .await
                .ok_or_else(no_wizard)?;

            let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
            Ok(Json(snapshot(&wizard)))
        }
        Err(e) => {
            warn!("Appointment submission failed for user {}: {}", user.id, e);
            store
                .with_wizard(&user.id, |wizard| wizard.fail_submit(e.to_string()))
                .await
                .ok_or_else(no_wizard)?;

            Err(AppError::ExternalService(e.to_string()))
        }
    }
}

#[axum::debug_handler]
pub async fn reset_wizard(
    Extension(user): Extension<User>,
    Extension(store): Extension<Arc<WizardStore>>,
) -> Result<Json<Value>, AppError> {
    store
        .with_wizard(&user.id, |wizard| wizard.reset())
        .await
        .ok_or_else(no_wizard)?;

    let wizard = store.get(&user.id).await.ok_or_else(no_wizard)?;
    Ok(Json(snapshot(&wizard)))
}

async fn fetch_and_install_slots(
    state: &Arc<AppConfig>,
    store: &Arc<WizardStore>,
    user_id: &str,
    doctor_id: Uuid,
    date: NaiveDate,
    epoch: u64,
    auth_token: &str,
) -> Result<(), AppError> {
    let resolver = SlotResolver::new(state);
    let slots = resolver.available_slots(doctor_id, date, auth_token)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let installed = store
        .with_wizard(user_id, |wizard| wizard.install_slots(epoch, slots))
        .await
        .ok_or_else(no_wizard)?;

    // A stale install means the selection changed mid-fetch; the newer
    // request's result is authoritative, so this one is dropped.
    if let Err(WizardError::StaleSlots) = installed {
        debug!("Discarded stale slot response for user {}", user_id);
        return Ok(());
    }
    installed.map_err(wizard_error)
}
