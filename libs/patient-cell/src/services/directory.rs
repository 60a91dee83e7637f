use anyhow::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::Patient;

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_patients(&self, active_only: bool, auth_token: &str) -> Result<Vec<Patient>> {
        debug!("Fetching patients (active_only: {})", active_only);

        let mut path = "/rest/v1/patients?order=full_name.asc".to_string();
        if active_only {
            path.push_str("&is_active=eq.true");
        }

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let patients: Vec<Patient> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Patient>, _>>()?;

        Ok(patients)
    }
}
