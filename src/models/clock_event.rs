use super::event_kind::EventKind;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;

/// A single persisted clock event. Append-only: at most one `in` and one
/// `out` per employee per local day, enforced by the store's UNIQUE
/// constraint. Never mutated, only superseded by events on later days.
#[derive(Debug, Clone, Serialize)]
pub struct ClockEvent {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,  // ⇔ events.date (TEXT "YYYY-MM-DD", local)
    pub time: NaiveTime,  // ⇔ events.time (TEXT "HH:MM", local)
    pub kind: EventKind,  // ⇔ events.kind ('in' | 'out')
    pub rule: String,     // ⇔ events.rule (classifier tag)
    pub justification: Option<String>,
    pub category: Option<String>,
    pub task_note: Option<String>,
    pub authorized_by: Option<String>,
    pub geofence_ok: Option<bool>, // None when no fence was configured
    pub flags: Vec<String>,        // ⇔ events.meta (JSON array)
    pub source: String,            // ⇔ events.source (default 'cli')
    pub created_at: String,        // ⇔ events.created_at (ISO8601)
}

impl ClockEvent {
    pub fn new(
        employee_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        kind: EventKind,
        rule: String,
    ) -> Self {
        Self {
            id: 0,
            employee_id,
            date,
            time,
            kind,
            rule,
            justification: None,
            category: None,
            task_note: None,
            authorized_by: None,
            geofence_ok: None,
            flags: Vec::new(),
            source: "cli".to_string(),
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M").to_string()
    }

    /// Flags are stored in `events.meta` as a JSON array.
    pub fn flags_json(&self) -> String {
        serde_json::to_string(&self.flags).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn flags_from_json(meta: &str) -> Vec<String> {
        if meta.trim().is_empty() {
            return Vec::new();
        }
        serde_json::from_str(meta).unwrap_or_default()
    }
}
