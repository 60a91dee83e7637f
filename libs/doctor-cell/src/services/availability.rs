use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

/// Row shape returned by the get_available_time_slots procedure.
#[derive(Debug, Deserialize)]
struct TimeSlotRow {
    time_slot: String,
}

/// Fetches the still-bookable times for a doctor on a date. The derivation
/// (schedule minus taken, non-cancelled appointments) lives entirely in the
/// remote procedure; the client treats the result as an opaque ordered list.
pub struct SlotResolver {
    supabase: SupabaseClient,
}

impl SlotResolver {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// An empty vector is a valid answer ("no availability") and is distinct
    /// from the error case, which callers surface without retrying.
    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<String>> {
        debug!("Fetching available slots for doctor {} on {}", doctor_id, date);

        let rows: Vec<TimeSlotRow> = self.supabase.rpc(
            "get_available_time_slots",
            Some(auth_token),
            json!({
                "doctor_uuid": doctor_id,
                "appointment_date": date,
            }),
        ).await?;

        let slots: Vec<String> = rows.into_iter().map(|row| row.time_slot).collect();
        debug!("Remote returned {} slots", slots.len());

        Ok(slots)
    }
}
