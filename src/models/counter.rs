use chrono::NaiveDate;
use serde::Serialize;

/// Per-employee rolling weekly score. Owned by the streak tracker:
/// reset in place at week boundaries, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyScoreCounter {
    pub employee_id: i64,
    pub late_count_week: i32,
    pub points_week: i32,
    pub last_week_start: Option<NaiveDate>,
    pub last_event_local_date: Option<NaiveDate>,
}

impl WeeklyScoreCounter {
    pub fn new(employee_id: i64) -> Self {
        Self {
            employee_id,
            late_count_week: 0,
            points_week: 0,
            last_week_start: None,
            last_event_local_date: None,
        }
    }
}
