use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Doctor, UpsertDoctorRequest, validate_schedule};

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// List doctors with their weekly schedules embedded, ordered by name.
    pub async fn list_doctors(&self, active_only: bool, auth_token: &str) -> Result<Vec<Doctor>> {
        debug!("Fetching doctors (active_only: {})", active_only);

        let mut path = "/rest/v1/doctors?select=*,doctor_schedules(*)&order=full_name.asc".to_string();
        if active_only {
            path.push_str("&is_active=eq.true");
        }

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let doctors: Vec<Doctor> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Doctor>, _>>()?;

        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: Uuid, auth_token: &str) -> Result<Doctor> {
        let path = format!(
            "/rest/v1/doctors?select=*,doctor_schedules(*)&id=eq.{}",
            doctor_id
        );
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Doctor not found"));
        }

        let doctor: Doctor = serde_json::from_value(result[0].clone())?;
        Ok(doctor)
    }

    /// Create or update a doctor and replace its weekly schedule. Schedule
    /// rows are deleted and reinserted as a set, mirroring the remote store's
    /// ownership of the doctor_schedules table.
    pub async fn upsert_doctor(
        &self,
        request: UpsertDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor> {
        validate_schedule(&request.schedules)?;

        let doctor_data = json!({
            "full_name": request.full_name,
            "speciality": request.speciality,
            "crm": request.crm,
            "email": request.email,
            "phone": request.phone,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let doctor_id = if let Some(id) = request.id {
            debug!("Updating doctor: {}", id);

            let path = format!("/rest/v1/doctors?id=eq.{}", id);
            let result: Vec<Value> = self.supabase.request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(doctor_data),
                Some(headers),
            ).await?;

            if result.is_empty() {
                return Err(anyhow!("Doctor not found"));
            }

            // Replace the schedule set
            let delete_path = format!("/rest/v1/doctor_schedules?doctor_id=eq.{}", id);
            let _: Vec<Value> = self.supabase.request(
                Method::DELETE,
                &delete_path,
                Some(auth_token),
                None,
            ).await?;

            id
        } else {
            debug!("Creating doctor: {}", request.full_name);

            let result: Vec<Value> = self.supabase.request_with_headers(
                Method::POST,
                "/rest/v1/doctors",
                Some(auth_token),
                Some(doctor_data),
                Some(headers),
            ).await?;

            if result.is_empty() {
                return Err(anyhow!("Failed to create doctor"));
            }

            let created: Doctor = serde_json::from_value(result[0].clone())?;
            created.id
        };

        if !request.schedules.is_empty() {
            let schedule_rows: Vec<Value> = request.schedules.iter()
                .map(|entry| json!({
                    "doctor_id": doctor_id,
                    "day_of_week": entry.day_of_week,
                    "start_time": entry.start_time.format("%H:%M:%S").to_string(),
                    "end_time": entry.end_time.format("%H:%M:%S").to_string(),
                }))
                .collect();

            let _: Vec<Value> = self.supabase.request(
                Method::POST,
                "/rest/v1/doctor_schedules",
                Some(auth_token),
                Some(Value::Array(schedule_rows)),
            ).await?;
        }

        info!("Doctor {} saved with {} schedule entries", doctor_id, request.schedules.len());

        self.get_doctor(doctor_id, auth_token).await
    }

    /// Soft delete: flips is_active rather than removing the record, so
    /// historical appointments keep a valid reference.
    pub async fn deactivate_doctor(&self, doctor_id: Uuid, auth_token: &str) -> Result<()> {
        debug!("Deactivating doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let _: Vec<Value> = self.supabase.request(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "is_active": false })),
        ).await?;

        Ok(())
    }
}
