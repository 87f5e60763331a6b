use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::domain::models::availability::AvailabilitySlot;

/// Interviews occupy a fixed window from their start time. The stored
/// model carries only a start; coverage and overlap checks need an extent.
pub const INTERVIEW_MINUTES: i64 = 60;

/// The [start, end) window an interview at `start` occupies. `None` when
/// the window would cross midnight; such slots are not schedulable.
pub fn interview_window(start: NaiveTime) -> Option<(NaiveTime, NaiveTime)> {
    let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(INTERVIEW_MINUTES));
    if wrapped != 0 {
        return None;
    }
    Some((start, end))
}

/// Whether any of the interviewer's slots covers [start, end) on `date`.
/// Recurring slots match on weekday (0 = Monday), one-off slots on the
/// exact date.
pub fn covers_slot(
    slots: &[AvailabilitySlot],
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> bool {
    let weekday = date.weekday().num_days_from_monday() as i32;

    slots.iter().any(|slot| {
        let day_matches = if slot.is_recurring {
            slot.day_of_week == Some(weekday)
        } else {
            slot.specific_date == Some(date)
        };

        day_matches && slot.start_time <= start && end <= slot.end_time
    })
}
