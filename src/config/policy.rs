//! Attendance policy: the single configuration object every rule reads
//! from. Loaded once from the policy file and passed explicitly into
//! `resolve`/`classify`; no call site carries its own thresholds.

use crate::errors::{AppError, AppResult};
use crate::models::geofence::GeofenceConfig;
use crate::utils::time::{hhmm, hhmm_opt};
use chrono::{FixedOffset, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Hard global registration windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalWindows {
    #[serde(with = "hhmm")]
    pub checkin_open: NaiveTime,
    #[serde(with = "hhmm")]
    pub checkin_close: NaiveTime,
    #[serde(with = "hhmm")]
    pub checkout_open: NaiveTime,
    #[serde(with = "hhmm")]
    pub checkout_close: NaiveTime,
    #[serde(with = "hhmm")]
    pub saturday_checkout_open: NaiveTime,
    #[serde(with = "hhmm")]
    pub saturday_checkout_close: NaiveTime,
}

/// Check-in bucketing around the scheduled start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRules {
    pub grace_minutes: i64,
    pub late_to_inclusive_minutes: i64,
    pub oor_from_minutes: i64,
}

/// Check-out bucketing around the scheduled (effective) end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitRules {
    /// Wall-clock gate: leaving before the scheduled end counts as an
    /// early departure only from this time onward. Earlier departures go
    /// to manager review instead.
    #[serde(with = "hhmm")]
    pub early_out_from: NaiveTime,
    pub on_time_to_minutes: i64,
    pub overtime_to_minutes: i64,
    pub oor_out_from_minutes: i64,
}

/// One weekday in the plan. Closed days may omit the times entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayEntry {
    pub open: bool,
    #[serde(default, with = "hhmm_opt")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub end: Option<NaiveTime>,
    #[serde(default)]
    pub half_day: bool,
    #[serde(default, with = "hhmm_opt")]
    pub end_override: Option<NaiveTime>,
}

impl DayEntry {
    fn closed() -> Self {
        Self {
            open: false,
            start: None,
            end: None,
            half_day: false,
            end_override: None,
        }
    }

    fn workday(start: &str, end: &str) -> Self {
        Self {
            open: true,
            start: NaiveTime::parse_from_str(start, "%H:%M").ok(),
            end: NaiveTime::parse_from_str(end, "%H:%M").ok(),
            half_day: false,
            end_override: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlan {
    pub monday: DayEntry,
    pub tuesday: DayEntry,
    pub wednesday: DayEntry,
    pub thursday: DayEntry,
    pub friday: DayEntry,
    pub saturday: DayEntry,
    pub sunday: DayEntry,
}

impl WeekPlan {
    pub fn entry(&self, weekday: Weekday) -> &DayEntry {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakRules {
    pub tolerated_lates_per_week: i32,
}

/// Weekly gamification points per classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsRules {
    pub early: i32,
    pub on_time: i32,
    pub overtime: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePolicy {
    /// Timezone identifier, kept as metadata on every record.
    pub tz: String,
    /// Fixed offset applied once at the boundary (Honduras has no DST).
    pub utc_offset_minutes: i32,
    pub windows: GlobalWindows,
    pub entry: EntryRules,
    pub exit: ExitRules,
    pub week: WeekPlan,
    pub streaks: StreakRules,
    pub points: PointsRules,
    #[serde(default)]
    pub geofence: Option<GeofenceConfig>,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        let t = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").unwrap();
        Self {
            tz: "America/Tegucigalpa".to_string(),
            utc_offset_minutes: -360,
            windows: GlobalWindows {
                checkin_open: t("07:00"),
                checkin_close: t("11:00"),
                checkout_open: t("16:30"),
                checkout_close: t("21:00"),
                saturday_checkout_open: t("11:00"),
                saturday_checkout_close: t("13:00"),
            },
            entry: EntryRules {
                grace_minutes: 5,
                late_to_inclusive_minutes: 20,
                oor_from_minutes: 21,
            },
            exit: ExitRules {
                early_out_from: t("13:00"),
                on_time_to_minutes: 5,
                overtime_to_minutes: 120,
                oor_out_from_minutes: 121,
            },
            week: WeekPlan {
                monday: DayEntry::workday("08:00", "17:00"),
                tuesday: DayEntry::workday("08:00", "17:00"),
                wednesday: DayEntry::workday("08:00", "17:00"),
                thursday: DayEntry::workday("08:00", "17:00"),
                friday: DayEntry::workday("08:00", "17:00"),
                saturday: DayEntry {
                    open: true,
                    start: NaiveTime::from_hms_opt(8, 0, 0),
                    end: NaiveTime::from_hms_opt(12, 0, 0),
                    half_day: true,
                    end_override: NaiveTime::from_hms_opt(12, 0, 0),
                },
                sunday: DayEntry::closed(),
            },
            streaks: StreakRules {
                tolerated_lates_per_week: 1,
            },
            points: PointsRules {
                early: 3,
                on_time: 2,
                overtime: 3,
            },
            geofence: None,
        }
    }
}

impl SchedulePolicy {
    /// Structural checks beyond what serde can express. Violations are
    /// configuration errors, surfaced before any rule runs.
    pub fn validate(&self) -> AppResult<()> {
        if self.windows.checkin_open >= self.windows.checkin_close {
            return Err(AppError::Config(
                "checkin_open must be before checkin_close".into(),
            ));
        }
        if self.windows.checkout_open >= self.windows.checkout_close {
            return Err(AppError::Config(
                "checkout_open must be before checkout_close".into(),
            ));
        }
        if self.windows.saturday_checkout_open >= self.windows.saturday_checkout_close {
            return Err(AppError::Config(
                "saturday_checkout_open must be before saturday_checkout_close".into(),
            ));
        }
        if self.entry.grace_minutes < 0
            || self.entry.late_to_inclusive_minutes <= self.entry.grace_minutes
        {
            return Err(AppError::Config(
                "entry buckets must satisfy 0 <= grace < late_to_inclusive".into(),
            ));
        }
        if self.entry.oor_from_minutes != self.entry.late_to_inclusive_minutes + 1 {
            return Err(AppError::Config(
                "entry buckets must be contiguous: oor_from = late_to_inclusive + 1".into(),
            ));
        }
        if self.exit.oor_out_from_minutes != self.exit.overtime_to_minutes + 1 {
            return Err(AppError::Config(
                "exit buckets must be contiguous: oor_out_from = overtime_to + 1".into(),
            ));
        }

        for (name, day) in [
            ("monday", &self.week.monday),
            ("tuesday", &self.week.tuesday),
            ("wednesday", &self.week.wednesday),
            ("thursday", &self.week.thursday),
            ("friday", &self.week.friday),
            ("saturday", &self.week.saturday),
            ("sunday", &self.week.sunday),
        ] {
            if !day.open {
                continue;
            }
            let (Some(start), Some(end)) = (day.start, day.end) else {
                return Err(AppError::ScheduleMissing(name.to_string()));
            };
            if start >= end {
                return Err(AppError::Config(format!("{name}: start must be before end")));
            }
            if day.half_day && day.end_override.is_none() {
                return Err(AppError::Config(format!(
                    "{name}: half_day requires end_override"
                )));
            }
        }

        if let Some(fence) = &self.geofence {
            if fence.radius_m <= 0.0 {
                return Err(AppError::Config("geofence radius must be positive".into()));
            }
            if fence.center_lat.abs() > 90.0 || fence.center_lon.abs() > 180.0 {
                return Err(AppError::Config("geofence center out of bounds".into()));
            }
        }

        Ok(())
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// Current wall clock in the policy timezone. The conversion happens
    /// exactly once, here; every comparison downstream is local.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset()).naive_local()
    }
}
