use std::collections::HashMap;

use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentStatus, CreateAppointmentRequest};
use crate::services::wizard::BookingWizard;

pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// All appointments, ordered by date then time ascending.
    pub async fn list_appointments(&self, auth_token: &str) -> Result<Vec<Appointment>> {
        debug!("Fetching appointments");

        let path = "/rest/v1/appointments?order=appointment_date.asc,appointment_time.asc";
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            Some(auth_token),
            None,
        ).await?;

        let appointments: Vec<Appointment> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Appointment>, _>>()?;

        Ok(appointments)
    }

    /// Creates an appointment for the patient profile attached to the
    /// authenticated user. The remote store is the sole writer of
    /// authoritative appointment state and serializes concurrent bookings.
    pub async fn create_appointment(
        &self,
        user_id: &str,
        request: CreateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment> {
        let patient_id = self.resolve_patient_id(user_id, auth_token).await?;

        let appointment_data = json!({
            "patient_id": patient_id,
            "doctor_id": request.doctor_id,
            "appointment_date": request.appointment_date,
            "appointment_time": request.appointment_time,
            "appointment_type": request.appointment_type.to_string(),
            "status": AppointmentStatus::Scheduled.to_string(),
            "notes": request.notes,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(auth_token),
            Some(appointment_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Failed to create appointment"));
        }

        let appointment: Appointment = serde_json::from_value(result[0].clone())?;
        info!("Appointment {} created for patient {}", appointment.id, patient_id);

        Ok(appointment)
    }

    async fn resolve_patient_id(&self, user_id: &str, auth_token: &str) -> Result<Uuid> {
        let path = format!("/rest/v1/patients?select=id&user_id=eq.{}", user_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let row = result.first().ok_or_else(|| anyhow!("Patient profile not found"))?;
        let id = row["id"].as_str().ok_or_else(|| anyhow!("Malformed patient row"))?;
        Ok(Uuid::parse_str(id)?)
    }
}

/// In-process store of live booking wizards, keyed per user. This is the
/// only shared mutable state in the flow; the remote store owns everything
/// else.
#[derive(Default)]
pub struct WizardStore {
    wizards: RwLock<HashMap<String, BookingWizard>>,
}

impl WizardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any existing wizard for the user with a fresh one.
    pub async fn start(&self, user_id: &str, wizard: BookingWizard) {
        self.wizards.write().await.insert(user_id.to_string(), wizard);
    }

    pub async fn get(&self, user_id: &str) -> Option<BookingWizard> {
        self.wizards.read().await.get(user_id).cloned()
    }

    /// Runs a closure against the user's wizard under the write lock.
    pub async fn with_wizard<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut BookingWizard) -> T,
    ) -> Option<T> {
        let mut wizards = self.wizards.write().await;
        wizards.get_mut(user_id).map(f)
    }

    pub async fn remove(&self, user_id: &str) {
        self.wizards.write().await.remove(user_id);
    }
}
