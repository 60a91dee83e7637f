use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    /// Opaque "HH:MM" value chosen from the remote slot list.
    pub appointment_time: String,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Consultation,
    Exam,
    Return,
}

impl Default for AppointmentType {
    fn default() -> Self {
        AppointmentType::Consultation
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentType::Consultation => write!(f, "consultation"),
            AppointmentType::Exam => write!(f, "exam"),
            AppointmentType::Return => write!(f, "return"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// Payload handed to the remote store when a booking is submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub appointment_type: AppointmentType,
    pub notes: String,
}

/// Summary shown once a booking lands, echoing the selection verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub appointment_id: Uuid,
    pub doctor_name: String,
    pub speciality: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub appointment_type: AppointmentType,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Specialty must not be empty")]
    EmptySpecialty,

    #[error("Choose a specialty first")]
    SpecialtyNotChosen,

    #[error("Doctor does not practice the chosen specialty")]
    SpecialtyMismatch,

    #[error("Doctor is no longer accepting appointments")]
    DoctorInactive,

    #[error("Choose a doctor first")]
    DoctorNotChosen,

    #[error("Date is not among the doctor's bookable dates")]
    DateNotBookable,

    #[error("Choose a date first")]
    DateNotChosen,

    #[error("Slot list is stale for the current selection")]
    StaleSlots,

    #[error("No slots loaded for the chosen date")]
    SlotsNotLoaded,

    #[error("Time is not among the available slots")]
    TimeNotAvailable,

    #[error("Notes must not exceed {0} characters")]
    NotesTooLong(usize),

    #[error("Booking is not ready to submit")]
    NotReadyToSubmit,

    #[error("A submission is already in flight")]
    SubmitInFlight,

    #[error("Booking already submitted; start a new one")]
    AlreadySubmitted,
}
