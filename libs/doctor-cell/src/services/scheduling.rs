use chrono::{Datelike, Duration, NaiveDate};

use crate::models::ScheduleEntry;

/// Calendar dates on which a doctor nominally works, walking day offsets
/// `1..=horizon_days` from `from`. `from` itself is excluded: same-day
/// booking is not offered. An empty schedule yields an empty sequence.
pub fn candidate_dates(
    schedule: &[ScheduleEntry],
    horizon_days: u32,
    from: NaiveDate,
) -> impl Iterator<Item = NaiveDate> + '_ {
    (1..=i64::from(horizon_days))
        .map(move |offset| from + Duration::days(offset))
        .filter(|date| {
            let day_of_week = date.weekday().num_days_from_sunday() as i32;
            schedule.iter().any(|entry| entry.day_of_week == day_of_week)
        })
}
