use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::NaiveTime;
use thiserror::Error;

/// One recurring weekly work interval. Several entries may share a
/// day_of_week (split shifts); day 0 is Sunday, matching the remote schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub speciality: String,
    pub crm: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    #[serde(rename = "doctor_schedules", default)]
    pub schedules: Vec<ScheduleEntry>,
}

impl Doctor {
    /// Case-insensitive substring match on name, speciality or license id.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.full_name.to_lowercase().contains(&term)
            || self.speciality.to_lowercase().contains(&term)
            || self.crm.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertDoctorRequest {
    pub id: Option<Uuid>,
    pub full_name: String,
    pub speciality: String,
    pub crm: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub schedules: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Error)]
pub enum ScheduleError {
    #[error("Day of week must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidDayOfWeek(i32),

    #[error("Start time {start} must be before end time {end}")]
    EmptyRange { start: NaiveTime, end: NaiveTime },
}

/// Validates a weekly schedule before it is written to the remote store.
pub fn validate_schedule(schedule: &[ScheduleEntry]) -> Result<(), ScheduleError> {
    for entry in schedule {
        if !(0..=6).contains(&entry.day_of_week) {
            return Err(ScheduleError::InvalidDayOfWeek(entry.day_of_week));
        }
        if entry.start_time >= entry.end_time {
            return Err(ScheduleError::EmptyRange {
                start: entry.start_time,
                end: entry.end_time,
            });
        }
    }
    Ok(())
}
