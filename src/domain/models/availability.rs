use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{NaiveDate, NaiveTime};
use sqlx::FromRow;

/// A window in which an interviewer can take interviews. Either a
/// recurring weekday window (`day_of_week`, 0 = Monday) or a one-off
/// window on `specific_date`. Consumed read-only by the assignment engine.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilitySlot {
    pub id: String,
    pub interviewer_id: String,
    pub day_of_week: Option<i32>,
    pub specific_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_recurring: bool,
}

impl AvailabilitySlot {
    pub fn recurring(interviewer_id: String, day_of_week: i32, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            interviewer_id,
            day_of_week: Some(day_of_week),
            specific_date: None,
            start_time,
            end_time,
            is_recurring: true,
        }
    }

    pub fn on_date(interviewer_id: String, date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            interviewer_id,
            day_of_week: None,
            specific_date: Some(date),
            start_time,
            end_time,
            is_recurring: false,
        }
    }
}
