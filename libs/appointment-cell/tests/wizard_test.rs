// Booking wizard state machine coverage: step guards, forward-dependency
// invalidation, stale slot discard, and the submit lifecycle.

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use appointment_cell::models::{AppointmentType, WizardError};
use appointment_cell::services::wizard::{BookingWizard, WizardStep};
use doctor_cell::models::{Doctor, ScheduleEntry};

// 2024-06-06 is a Thursday.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 6).unwrap()
}

fn monday_doctor() -> Doctor {
    Doctor {
        id: Uuid::new_v4(),
        full_name: "Dr. João Santos".to_string(),
        speciality: "Cardiologia".to_string(),
        crm: "CRM/SP 123456".to_string(),
        email: "joao@clinica.example".to_string(),
        phone: None,
        is_active: true,
        schedules: vec![ScheduleEntry {
            day_of_week: 1,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        }],
    }
}

fn wizard_at_date_step() -> (BookingWizard, Doctor) {
    let mut wizard = BookingWizard::new(today());
    let doctor = monday_doctor();
    wizard.choose_specialty("Cardiologia").unwrap();
    wizard.choose_doctor(doctor.clone()).unwrap();
    (wizard, doctor)
}

fn first_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

#[test]
fn starts_at_specialty_step() {
    let wizard = BookingWizard::new(today());
    assert_eq!(wizard.step(), WizardStep::ChooseSpecialty);
    assert!(wizard.candidate_dates().is_empty());
}

#[test]
fn rejects_empty_specialty() {
    let mut wizard = BookingWizard::new(today());
    assert_matches!(wizard.choose_specialty("   "), Err(WizardError::EmptySpecialty));
    assert_eq!(wizard.step(), WizardStep::ChooseSpecialty);
}

#[test]
fn doctor_must_match_chosen_specialty() {
    let mut wizard = BookingWizard::new(today());
    wizard.choose_specialty("Dermatologia").unwrap();

    assert_matches!(
        wizard.choose_doctor(monday_doctor()),
        Err(WizardError::SpecialtyMismatch)
    );
    assert_eq!(wizard.step(), WizardStep::ChooseDoctor);
}

#[test]
fn inactive_doctor_is_rejected() {
    let mut wizard = BookingWizard::new(today());
    wizard.choose_specialty("Cardiologia").unwrap();

    let mut doctor = monday_doctor();
    doctor.is_active = false;
    assert_matches!(wizard.choose_doctor(doctor), Err(WizardError::DoctorInactive));
}

#[test]
fn doctor_before_specialty_is_rejected() {
    let mut wizard = BookingWizard::new(today());
    assert_matches!(
        wizard.choose_doctor(monday_doctor()),
        Err(WizardError::SpecialtyNotChosen)
    );
}

#[test]
fn candidate_dates_are_the_mondays_in_the_window() {
    let (wizard, _) = wizard_at_date_step();

    let expected: Vec<NaiveDate> = [(6, 10), (6, 17), (6, 24), (7, 1)]
        .iter()
        .map(|(m, d)| NaiveDate::from_ymd_opt(2024, *m, *d).unwrap())
        .collect();
    assert_eq!(wizard.candidate_dates(), expected);
}

#[test]
fn date_outside_candidate_set_is_rejected() {
    let (mut wizard, _) = wizard_at_date_step();

    // A Tuesday within the window, but the doctor only works Mondays.
    let tuesday = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
    assert_matches!(wizard.choose_date(tuesday), Err(WizardError::DateNotBookable));

    // Today itself is never bookable.
    assert_matches!(wizard.choose_date(today()), Err(WizardError::DateNotBookable));
}

#[test]
fn doctor_with_no_schedule_has_no_bookable_dates() {
    let mut wizard = BookingWizard::new(today());
    wizard.choose_specialty("Cardiologia").unwrap();

    let mut doctor = monday_doctor();
    doctor.schedules.clear();
    wizard.choose_doctor(doctor).unwrap();

    assert!(wizard.candidate_dates().is_empty());
    assert_matches!(
        wizard.choose_date(first_monday()),
        Err(WizardError::DateNotBookable)
    );
}

#[test]
fn time_requires_installed_slots_and_membership() {
    let (mut wizard, _) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();

    assert_matches!(wizard.choose_time("08:00"), Err(WizardError::SlotsNotLoaded));

    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec!["08:00".into(), "08:30".into()]).unwrap();

    assert_matches!(wizard.choose_time("09:00"), Err(WizardError::TimeNotAvailable));
    wizard.choose_time("08:30").unwrap();
    assert_eq!(wizard.step(), WizardStep::Confirm);
}

#[test]
fn empty_slot_list_is_a_valid_terminal_state() {
    let (mut wizard, _) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();

    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec![]).unwrap();

    assert_eq!(wizard.available_slots(), Some(&[][..]));
    assert_matches!(wizard.choose_time("08:00"), Err(WizardError::TimeNotAvailable));
    assert_eq!(wizard.step(), WizardStep::ChooseTime);
    assert_matches!(wizard.begin_submit(), Err(WizardError::NotReadyToSubmit));
}

#[test]
fn stale_slot_responses_are_discarded() {
    let (mut wizard, _) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();
    let old_epoch = wizard.slot_epoch();

    // Selection moves to a different date while the fetch is in flight.
    let next_monday = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
    wizard.choose_date(next_monday).unwrap();

    assert_matches!(
        wizard.install_slots(old_epoch, vec!["08:00".into()]),
        Err(WizardError::StaleSlots)
    );
    assert_eq!(wizard.available_slots(), None);

    // The current epoch still installs fine.
    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec!["10:00".into()]).unwrap();
    assert_eq!(wizard.available_slots(), Some(&["10:00".to_string()][..]));
}

#[test]
fn changing_specialty_clears_doctor_date_and_time() {
    let (mut wizard, _) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();
    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec!["08:00".into()]).unwrap();
    wizard.choose_time("08:00").unwrap();

    wizard.choose_specialty("Dermatologia").unwrap();

    assert!(wizard.doctor().is_none());
    assert!(wizard.date().is_none());
    assert!(wizard.time().is_none());
    assert_eq!(wizard.available_slots(), None);
    assert_eq!(wizard.step(), WizardStep::ChooseDoctor);
}

#[test]
fn changing_doctor_clears_date_and_time() {
    let (mut wizard, _) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();
    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec!["08:00".into()]).unwrap();
    wizard.choose_time("08:00").unwrap();

    let other = Doctor { id: Uuid::new_v4(), ..monday_doctor() };
    wizard.choose_doctor(other).unwrap();

    assert!(wizard.date().is_none());
    assert!(wizard.time().is_none());
    assert_eq!(wizard.available_slots(), None);
}

#[test]
fn changing_date_clears_time_only() {
    let (mut wizard, doctor) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();
    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec!["08:00".into()]).unwrap();
    wizard.choose_time("08:00").unwrap();

    let next_monday = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
    wizard.choose_date(next_monday).unwrap();

    assert_eq!(wizard.doctor().map(|d| d.id), Some(doctor.id));
    assert_eq!(wizard.date(), Some(next_monday));
    assert!(wizard.time().is_none());
    assert_eq!(wizard.available_slots(), None);
}

#[test]
fn notes_are_trimmed_and_bounded() {
    let mut wizard = BookingWizard::new(today());
    wizard.set_notes("  dor de cabeça  ").unwrap();
    assert_eq!(wizard.notes(), "dor de cabeça");

    let long = "x".repeat(201);
    assert_matches!(wizard.set_notes(&long), Err(WizardError::NotesTooLong(200)));
}

#[test]
fn submit_lifecycle_success() {
    let (mut wizard, doctor) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();
    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec!["08:00".into()]).unwrap();
    wizard.choose_time("08:00").unwrap();
    wizard.set_appointment_type(AppointmentType::Exam).unwrap();

    let request = wizard.begin_submit().unwrap();
    assert_eq!(request.doctor_id, doctor.id);
    assert_eq!(request.appointment_date, first_monday());
    assert_eq!(request.appointment_time, "08:00");
    assert_eq!(request.appointment_type, AppointmentType::Exam);
    assert!(wizard.submit_in_flight());

    // No second submission while one is outstanding.
    assert_matches!(wizard.begin_submit(), Err(WizardError::SubmitInFlight));
    // Nor any mutation.
    assert_matches!(wizard.choose_time("08:00"), Err(WizardError::SubmitInFlight));

    let appointment_id = Uuid::new_v4();
    wizard.complete_submit(appointment_id);

    assert_eq!(wizard.step(), WizardStep::Submitted);
    assert!(!wizard.submit_in_flight());

    let confirmation = wizard.confirmation().unwrap();
    assert_eq!(confirmation.appointment_id, appointment_id);
    assert_eq!(confirmation.doctor_name, doctor.full_name);
    assert_eq!(confirmation.speciality, "Cardiologia");
    assert_eq!(confirmation.appointment_date, first_monday());
    assert_eq!(confirmation.appointment_time, "08:00");
    assert_eq!(confirmation.appointment_type, AppointmentType::Exam);
}

#[test]
fn submitted_wizard_stays_put_until_reset() {
    let (mut wizard, _) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();
    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec!["08:00".into()]).unwrap();
    wizard.choose_time("08:00").unwrap();
    wizard.begin_submit().unwrap();
    wizard.complete_submit(Uuid::new_v4());

    assert_matches!(wizard.choose_specialty("Pediatria"), Err(WizardError::AlreadySubmitted));
    assert_matches!(wizard.begin_submit(), Err(WizardError::AlreadySubmitted));

    wizard.reset();
    assert_eq!(wizard.step(), WizardStep::ChooseSpecialty);
    assert!(wizard.confirmation().is_none());
    assert!(wizard.specialty().is_none());
}

#[test]
fn failed_submit_allows_retry_with_selection_intact() {
    let (mut wizard, _) = wizard_at_date_step();
    wizard.choose_date(first_monday()).unwrap();
    let epoch = wizard.slot_epoch();
    wizard.install_slots(epoch, vec!["08:00".into()]).unwrap();
    wizard.choose_time("08:00").unwrap();

    wizard.begin_submit().unwrap();
    wizard.fail_submit("service unavailable".to_string());

    assert_eq!(wizard.step(), WizardStep::Confirm);
    assert!(!wizard.submit_in_flight());
    assert_eq!(wizard.last_error(), Some("service unavailable"));
    assert_eq!(wizard.time(), Some("08:00"));

    // A second attempt is permitted and clears the surfaced error.
    let retry = wizard.begin_submit().unwrap();
    assert_eq!(retry.appointment_time, "08:00");
    assert!(wizard.last_error().is_none());
}

#[test]
fn submit_unreachable_before_confirm() {
    let (mut wizard, _) = wizard_at_date_step();
    assert_matches!(wizard.begin_submit(), Err(WizardError::NotReadyToSubmit));

    wizard.choose_date(first_monday()).unwrap();
    assert_matches!(wizard.begin_submit(), Err(WizardError::NotReadyToSubmit));
}
