//! Schedule resolution: weekday → effective day window.

use crate::config::policy::SchedulePolicy;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

/// The window configuration in effect on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub weekday: Weekday,
    pub start: NaiveTime,
    /// Nominal end of the workday.
    pub end: NaiveTime,
    /// End used for checkout arithmetic; differs from `end` on half days
    /// with an override.
    pub effective_end: NaiveTime,
    pub half_day: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayResolution {
    Open(DayWindow),
    Closed,
}

/// Resolve the effective window for `date`. Pure: same schedule + date
/// always yields the identical window.
///
/// A day marked open but missing its times is a configuration error,
/// reported and never retried.
pub fn resolve(policy: &SchedulePolicy, date: NaiveDate) -> AppResult<DayResolution> {
    let weekday = date.weekday();
    let entry = policy.week.entry(weekday);

    if !entry.open {
        return Ok(DayResolution::Closed);
    }

    let (Some(start), Some(end)) = (entry.start, entry.end) else {
        return Err(AppError::ScheduleMissing(format!("{weekday}")));
    };

    let effective_end = if entry.half_day {
        entry
            .end_override
            .ok_or_else(|| AppError::Config(format!("{weekday}: half_day requires end_override")))?
    } else {
        end
    };

    Ok(DayResolution::Open(DayWindow {
        weekday,
        start,
        end,
        effective_end,
        half_day: entry.half_day,
    }))
}
