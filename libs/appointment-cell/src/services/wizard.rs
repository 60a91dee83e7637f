use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use doctor_cell::models::Doctor;
use doctor_cell::services::scheduling::candidate_dates;

use crate::models::{
    AppointmentType, BookingConfirmation, CreateAppointmentRequest, WizardError,
};

/// How far ahead the booking flow offers dates.
pub const BOOKING_HORIZON_DAYS: u32 = 30;

/// Upper bound on free-text notes, matching the remote column.
pub const MAX_NOTES_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    ChooseSpecialty,
    ChooseDoctor,
    ChooseDate,
    ChooseTime,
    Confirm,
    Submitted,
}

/// The multi-step booking flow: specialty, doctor, date, time, confirm.
///
/// This is a pure state machine; slot fetching and submission are performed
/// around it by the service layer. Changing an upstream selection always
/// invalidates everything downstream of it, and the slot epoch lets a caller
/// detect that a slot list fetched earlier no longer matches the selection.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    today: NaiveDate,
    specialty: Option<String>,
    doctor: Option<Doctor>,
    date: Option<NaiveDate>,
    time: Option<String>,
    appointment_type: AppointmentType,
    notes: String,
    slots: Option<Vec<String>>,
    slot_epoch: u64,
    submit_in_flight: bool,
    confirmation: Option<BookingConfirmation>,
    last_error: Option<String>,
}

impl BookingWizard {
    /// `today` anchors the candidate-date window; the wizard never offers it
    /// (same-day booking is excluded by design).
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            specialty: None,
            doctor: None,
            date: None,
            time: None,
            appointment_type: AppointmentType::default(),
            notes: String::new(),
            slots: None,
            slot_epoch: 0,
            submit_in_flight: false,
            confirmation: None,
            last_error: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        if self.confirmation.is_some() {
            WizardStep::Submitted
        } else if self.specialty.is_none() {
            WizardStep::ChooseSpecialty
        } else if self.doctor.is_none() {
            WizardStep::ChooseDoctor
        } else if self.date.is_none() {
            WizardStep::ChooseDate
        } else if self.time.is_none() {
            WizardStep::ChooseTime
        } else {
            WizardStep::Confirm
        }
    }

    pub fn specialty(&self) -> Option<&str> {
        self.specialty.as_deref()
    }

    pub fn doctor(&self) -> Option<&Doctor> {
        self.doctor.as_ref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn appointment_type(&self) -> AppointmentType {
        self.appointment_type
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn available_slots(&self) -> Option<&[String]> {
        self.slots.as_deref()
    }

    pub fn submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Dates the chosen doctor works within the booking horizon. Empty when
    /// no doctor is chosen or the doctor has no schedule ("no availability").
    pub fn candidate_dates(&self) -> Vec<NaiveDate> {
        match &self.doctor {
            Some(doctor) => {
                candidate_dates(&doctor.schedules, BOOKING_HORIZON_DAYS, self.today).collect()
            }
            None => Vec::new(),
        }
    }

    pub fn choose_specialty(&mut self, specialty: &str) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        let specialty = specialty.trim();
        if specialty.is_empty() {
            return Err(WizardError::EmptySpecialty);
        }

        self.specialty = Some(specialty.to_string());
        self.doctor = None;
        self.invalidate_from_date();
        self.date = None;
        Ok(())
    }

    /// The doctor must be active and practice the chosen specialty; the
    /// caller supplies the record it offered to the user.
    pub fn choose_doctor(&mut self, doctor: Doctor) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        let specialty = self.specialty.as_deref().ok_or(WizardError::SpecialtyNotChosen)?;
        if !doctor.is_active {
            return Err(WizardError::DoctorInactive);
        }
        if doctor.speciality != specialty {
            return Err(WizardError::SpecialtyMismatch);
        }

        self.doctor = Some(doctor);
        self.invalidate_from_date();
        self.date = None;
        Ok(())
    }

    pub fn choose_date(&mut self, date: NaiveDate) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        if self.doctor.is_none() {
            return Err(WizardError::DoctorNotChosen);
        }
        if !self.candidate_dates().contains(&date) {
            return Err(WizardError::DateNotBookable);
        }

        self.date = Some(date);
        self.invalidate_from_date();
        Ok(())
    }

    /// Epoch to capture before fetching slots for the current selection.
    pub fn slot_epoch(&self) -> u64 {
        self.slot_epoch
    }

    /// Installs a fetched slot list. The epoch must match the current one:
    /// a response that raced with a doctor/date change is rejected so it can
    /// never overwrite slots for the newer selection.
    pub fn install_slots(&mut self, epoch: u64, slots: Vec<String>) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        if self.date.is_none() {
            return Err(WizardError::DateNotChosen);
        }
        if epoch != self.slot_epoch {
            return Err(WizardError::StaleSlots);
        }

        self.slots = Some(slots);
        self.time = None;
        Ok(())
    }

    pub fn choose_time(&mut self, time: &str) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        if self.date.is_none() {
            return Err(WizardError::DateNotChosen);
        }
        let slots = self.slots.as_ref().ok_or(WizardError::SlotsNotLoaded)?;
        if !slots.iter().any(|slot| slot == time) {
            return Err(WizardError::TimeNotAvailable);
        }

        self.time = Some(time.to_string());
        Ok(())
    }

    pub fn set_appointment_type(&mut self, appointment_type: AppointmentType) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        self.appointment_type = appointment_type;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        let notes = notes.trim();
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(WizardError::NotesTooLong(MAX_NOTES_LEN));
        }
        self.notes = notes.to_string();
        Ok(())
    }

    /// Marks a submission as in flight and returns the payload to send.
    /// Only one request may be outstanding at a time.
    pub fn begin_submit(&mut self) -> Result<CreateAppointmentRequest, WizardError> {
        if self.confirmation.is_some() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.submit_in_flight {
            return Err(WizardError::SubmitInFlight);
        }
        if self.step() != WizardStep::Confirm {
            return Err(WizardError::NotReadyToSubmit);
        }

        let doctor = self.doctor.as_ref().expect("guarded by step()");
        let request = CreateAppointmentRequest {
            doctor_id: doctor.id,
            appointment_date: self.date.expect("guarded by step()"),
            appointment_time: self.time.clone().expect("guarded by step()"),
            appointment_type: self.appointment_type,
            notes: self.notes.clone(),
        };

        self.submit_in_flight = true;
        self.last_error = None;
        Ok(request)
    }

    /// Success path: move to Submitted and keep the selection for the
    /// confirmation summary. The wizard stays here until reset() is called.
    pub fn complete_submit(&mut self, appointment_id: Uuid) {
        let doctor = self.doctor.as_ref().expect("submission was in flight");
        self.confirmation = Some(BookingConfirmation {
            appointment_id,
            doctor_name: doctor.full_name.clone(),
            speciality: doctor.speciality.clone(),
            appointment_date: self.date.expect("submission was in flight"),
            appointment_time: self.time.clone().expect("submission was in flight"),
            appointment_type: self.appointment_type,
        });
        self.submit_in_flight = false;
    }

    /// Failure path: stay in Confirm with the selection intact so the user
    /// can resubmit. No automatic retry.
    pub fn fail_submit(&mut self, error: String) {
        self.submit_in_flight = false;
        self.last_error = Some(error);
    }

    /// Starts a new booking with all fields cleared.
    pub fn reset(&mut self) {
        *self = Self::new(self.today);
    }

    fn ensure_mutable(&self) -> Result<(), WizardError> {
        if self.confirmation.is_some() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.submit_in_flight {
            return Err(WizardError::SubmitInFlight);
        }
        Ok(())
    }

    // Forward-dependency invalidation below the date step: dropping the
    // time, the loaded slots and advancing the epoch so in-flight slot
    // fetches for the old selection are discarded on arrival.
    fn invalidate_from_date(&mut self) {
        self.time = None;
        self.slots = None;
        self.slot_epoch += 1;
    }
}
