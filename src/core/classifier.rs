//! Clock event classification: buckets a check-in or check-out against
//! the resolved day window and the policy thresholds.
//!
//! Classification is pure. It never reads storage and never produces
//! user prose, only rule tags and message keys; duplicate and orphan
//! detection belong to the caller.

use crate::config::policy::SchedulePolicy;
use crate::core::resolver::DayWindow;
use crate::models::event_kind::EventKind;
use crate::models::message_key::MessageKey;
use crate::utils::time::minutes_between;
use chrono::{NaiveDateTime, Weekday};
use serde::Serialize;

/// Stable rule tag persisted with every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleTag {
    Early,
    OnTime,
    Late,
    OutOfRange,
    /// Check-in attempted outside the global registration gate.
    OutOfRangeOpen,
    EarlyOut,
    OnTimeOut,
    Overtime,
    OutOfRangeOut,
}

impl RuleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTag::Early => "early",
            RuleTag::OnTime => "on_time",
            RuleTag::Late => "late",
            RuleTag::OutOfRange => "oor",
            RuleTag::OutOfRangeOpen => "oor_open",
            RuleTag::EarlyOut => "early_out",
            RuleTag::OnTimeOut => "on_time_out",
            RuleTag::Overtime => "overtime",
            RuleTag::OutOfRangeOut => "oor_out",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "early" => Some(RuleTag::Early),
            "on_time" => Some(RuleTag::OnTime),
            "late" => Some(RuleTag::Late),
            "oor" => Some(RuleTag::OutOfRange),
            "oor_open" => Some(RuleTag::OutOfRangeOpen),
            "early_out" => Some(RuleTag::EarlyOut),
            "on_time_out" => Some(RuleTag::OnTimeOut),
            "overtime" => Some(RuleTag::Overtime),
            "oor_out" => Some(RuleTag::OutOfRangeOut),
            _ => None,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            RuleTag::Early => MessageKey::Early,
            RuleTag::OnTime => MessageKey::OnTime,
            RuleTag::Late => MessageKey::Late,
            RuleTag::OutOfRange | RuleTag::OutOfRangeOpen => MessageKey::Oor,
            RuleTag::EarlyOut => MessageKey::EarlyOut,
            RuleTag::OnTimeOut => MessageKey::OnTimeOut,
            RuleTag::Overtime => MessageKey::Overtime,
            RuleTag::OutOfRangeOut => MessageKey::OorOut,
        }
    }

    /// Lates counted by the weekly streak tracker.
    pub fn counts_as_late(&self) -> bool {
        matches!(self, RuleTag::Late | RuleTag::OutOfRange)
    }
}

/// What the employee must supply before the event can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequiredAction {
    /// Free-text reason, e.g. for a late arrival.
    Justification,
    /// Task description for overtime; different field semantics than a
    /// justification.
    TaskNote,
    /// Manager sign-off, stronger than a justification.
    Authorization,
}

/// A successful classification. Policy outcomes carry their required
/// action as data; they are never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub rule: RuleTag,
    /// Check-in: minutes after scheduled start (negative = early).
    /// Check-out: minutes before effective end (negative = after it).
    pub delta_minutes: i64,
    pub requires_justification: bool,
    pub requires_authorization: bool,
    pub requires_task_note: bool,
}

impl Classification {
    fn new(rule: RuleTag, delta_minutes: i64) -> Self {
        let (justification, authorization, task_note) = match rule {
            RuleTag::Late | RuleTag::EarlyOut | RuleTag::OutOfRangeOpen => (true, false, false),
            RuleTag::OutOfRange | RuleTag::OutOfRangeOut => (false, true, false),
            RuleTag::Overtime => (false, false, true),
            RuleTag::Early | RuleTag::OnTime | RuleTag::OnTimeOut => (false, false, false),
        };
        Self {
            rule,
            delta_minutes,
            requires_justification: justification,
            requires_authorization: authorization,
            requires_task_note: task_note,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        self.rule.message_key()
    }

    pub fn required_action(&self) -> Option<RequiredAction> {
        if self.requires_authorization {
            Some(RequiredAction::Authorization)
        } else if self.requires_task_note {
            Some(RequiredAction::TaskNote)
        } else if self.requires_justification {
            Some(RequiredAction::Justification)
        } else {
            None
        }
    }
}

/// Outcome of a classification attempt. `Blocked` means the attempt is
/// refused outright and no event may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Classified(Classification),
    Blocked(MessageKey),
}

/// Single entry point used by the handler layer.
pub fn classify(
    kind: EventKind,
    now: NaiveDateTime,
    window: &DayWindow,
    policy: &SchedulePolicy,
) -> Verdict {
    match kind {
        EventKind::In => Verdict::Classified(classify_check_in(now, window, policy)),
        EventKind::Out => classify_check_out(now, window, policy),
    }
}

/// Bucket a check-in by its signed distance from the scheduled start.
///
/// Boundary ties: exactly `grace` minutes early or late is still
/// on-time; exactly `late_to_inclusive` minutes late is still late.
pub fn classify_check_in(
    now: NaiveDateTime,
    window: &DayWindow,
    policy: &SchedulePolicy,
) -> Classification {
    let t = now.time();
    let delta = minutes_between(window.start, t);

    // Outside the global gate the delta does not matter: the attempt is
    // recorded but always flagged.
    let gate = &policy.windows;
    if t < gate.checkin_open || t > gate.checkin_close {
        return Classification::new(RuleTag::OutOfRangeOpen, delta);
    }

    let entry = &policy.entry;
    let rule = if delta < -entry.grace_minutes {
        RuleTag::Early
    } else if delta <= entry.grace_minutes {
        RuleTag::OnTime
    } else if delta <= entry.late_to_inclusive_minutes {
        RuleTag::Late
    } else {
        RuleTag::OutOfRange
    };

    Classification::new(rule, delta)
}

/// Bucket a check-out by its signed distance from the effective end.
///
/// Saturdays carry their own hard checkout window; outside it the
/// attempt is blocked entirely, not merely flagged.
pub fn classify_check_out(
    now: NaiveDateTime,
    window: &DayWindow,
    policy: &SchedulePolicy,
) -> Verdict {
    let t = now.time();

    if window.weekday == Weekday::Sat {
        let gate = &policy.windows;
        if t < gate.saturday_checkout_open || t > gate.saturday_checkout_close {
            return Verdict::Blocked(MessageKey::ClosedWindow);
        }
    }

    // Positive = leaving before the scheduled end.
    let delta = minutes_between(t, window.effective_end);
    let exit = &policy.exit;

    let rule = if delta > 0 {
        if t >= exit.early_out_from {
            RuleTag::EarlyOut
        } else {
            // Too early to be a normal short day: manager review.
            RuleTag::OutOfRangeOut
        }
    } else {
        let past_end = -delta;
        if past_end <= exit.on_time_to_minutes {
            RuleTag::OnTimeOut
        } else if past_end <= exit.overtime_to_minutes {
            RuleTag::Overtime
        } else {
            RuleTag::OutOfRangeOut
        }
    };

    Verdict::Classified(Classification::new(rule, delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::{DayResolution, resolve};
    use chrono::{NaiveDate, NaiveDateTime};

    fn policy() -> SchedulePolicy {
        SchedulePolicy::default()
    }

    fn monday_window(policy: &SchedulePolicy) -> DayWindow {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        match resolve(policy, date).unwrap() {
            DayResolution::Open(w) => w,
            DayResolution::Closed => panic!("monday must be open"),
        }
    }

    fn saturday_window(policy: &SchedulePolicy) -> DayWindow {
        let date = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap();
        match resolve(policy, date).unwrap() {
            DayResolution::Open(w) => w,
            DayResolution::Closed => panic!("saturday must be open"),
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn checkin_within_grace_is_on_time() {
        let p = policy();
        let w = monday_window(&p);
        let c = classify_check_in(at(8, 4), &w, &p);
        assert_eq!(c.rule, RuleTag::OnTime);
        assert!(!c.requires_justification && !c.requires_authorization);
    }

    #[test]
    fn checkin_grace_band_property() {
        // Every minute in [-grace, +grace] must be on-time, boundaries
        // included on both sides.
        let p = policy();
        let w = monday_window(&p);
        for m in -5i64..=5 {
            let now = at(8, 0) + chrono::Duration::minutes(m);
            let c = classify_check_in(now, &w, &p);
            assert_eq!(c.rule, RuleTag::OnTime, "delta {m} must be on-time");
            assert_eq!(c.delta_minutes, m);
        }
    }

    #[test]
    fn checkin_late_band_requires_justification() {
        let p = policy();
        let w = monday_window(&p);
        for m in 6i64..=20 {
            let now = at(8, 0) + chrono::Duration::minutes(m);
            let c = classify_check_in(now, &w, &p);
            assert_eq!(c.rule, RuleTag::Late, "delta {m} must be late");
            assert!(c.requires_justification);
            assert!(!c.requires_authorization);
        }
    }

    #[test]
    fn checkin_past_late_band_requires_authorization() {
        let p = policy();
        let w = monday_window(&p);
        // 08:21 .. 10:59 stays inside the global gate
        for m in [21i64, 30, 60, 120, 179] {
            let now = at(8, 0) + chrono::Duration::minutes(m);
            let c = classify_check_in(now, &w, &p);
            assert_eq!(c.rule, RuleTag::OutOfRange, "delta {m} must be oor");
            assert!(c.requires_authorization);
            assert_eq!(c.required_action(), Some(RequiredAction::Authorization));
        }
    }

    #[test]
    fn checkin_scenario_late_at_812() {
        let p = policy();
        let w = monday_window(&p);
        let c = classify_check_in(at(8, 12), &w, &p);
        assert_eq!(c.rule, RuleTag::Late);
        assert_eq!(c.delta_minutes, 12);
        assert!(c.requires_justification);
    }

    #[test]
    fn checkin_scenario_oor_at_825() {
        let p = policy();
        let w = monday_window(&p);
        let c = classify_check_in(at(8, 25), &w, &p);
        assert_eq!(c.rule, RuleTag::OutOfRange);
        assert!(c.requires_authorization);
    }

    #[test]
    fn checkin_before_gate_is_flagged_regardless_of_delta() {
        let p = policy();
        let w = monday_window(&p);
        // 06:30 is earlier than checkin_open (07:00)
        let c = classify_check_in(at(6, 30), &w, &p);
        assert_eq!(c.rule, RuleTag::OutOfRangeOpen);
        assert!(c.requires_justification);
        // 11:30 is past checkin_close (11:00)
        let c = classify_check_in(at(11, 30), &w, &p);
        assert_eq!(c.rule, RuleTag::OutOfRangeOpen);
        assert!(c.requires_justification);
    }

    #[test]
    fn checkout_on_time_window() {
        let p = policy();
        let w = monday_window(&p);
        let Verdict::Classified(c) = classify_check_out(at(17, 3), &w, &p) else {
            panic!("weekday checkout must classify");
        };
        assert_eq!(c.rule, RuleTag::OnTimeOut);
        assert!(c.required_action().is_none());
    }

    #[test]
    fn checkout_overtime_requires_task_note() {
        let p = policy();
        let w = monday_window(&p);
        let Verdict::Classified(c) = classify_check_out(at(18, 15), &w, &p) else {
            panic!("weekday checkout must classify");
        };
        assert_eq!(c.rule, RuleTag::Overtime);
        assert!(c.requires_task_note);
        assert!(!c.requires_justification);
    }

    #[test]
    fn checkout_far_past_end_requires_authorization() {
        let p = policy();
        let w = monday_window(&p);
        let Verdict::Classified(c) = classify_check_out(at(19, 5), &w, &p) else {
            panic!("weekday checkout must classify");
        };
        assert_eq!(c.rule, RuleTag::OutOfRangeOut);
        assert!(c.requires_authorization);
    }

    #[test]
    fn early_departure_after_gate_requires_justification() {
        let p = policy();
        let w = monday_window(&p);
        let Verdict::Classified(c) = classify_check_out(at(16, 0), &w, &p) else {
            panic!("weekday checkout must classify");
        };
        assert_eq!(c.rule, RuleTag::EarlyOut);
        assert!(c.requires_justification);
        assert_eq!(c.delta_minutes, 60);
    }

    #[test]
    fn early_departure_before_gate_goes_to_manager_review() {
        let p = policy();
        let w = monday_window(&p);
        // 11:30 is before early_out_from (13:00): not a normal short day
        let Verdict::Classified(c) = classify_check_out(at(11, 30), &w, &p) else {
            panic!("weekday checkout must classify");
        };
        assert_eq!(c.rule, RuleTag::OutOfRangeOut);
        assert!(c.requires_authorization);
    }

    #[test]
    fn saturday_checkout_outside_window_is_blocked() {
        let p = policy();
        let w = saturday_window(&p);
        let sat = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap();
        let v = classify_check_out(sat.and_hms_opt(13, 5, 0).unwrap(), &w, &p);
        assert_eq!(v, Verdict::Blocked(MessageKey::ClosedWindow));
        let v = classify_check_out(sat.and_hms_opt(10, 30, 0).unwrap(), &w, &p);
        assert_eq!(v, Verdict::Blocked(MessageKey::ClosedWindow));
    }

    #[test]
    fn saturday_checkout_inside_window_uses_override_end() {
        let p = policy();
        let w = saturday_window(&p);
        let sat = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap();
        // 12:30 is 30' past the 12:00 override: overtime, inside window
        let Verdict::Classified(c) = classify_check_out(sat.and_hms_opt(12, 30, 0).unwrap(), &w, &p)
        else {
            panic!("saturday 12:30 must classify");
        };
        assert_eq!(c.rule, RuleTag::Overtime);
        assert_eq!(c.delta_minutes, -30);
    }

    #[test]
    fn dispatch_matches_dedicated_functions() {
        let p = policy();
        let w = monday_window(&p);
        assert_eq!(
            classify(EventKind::In, at(8, 4), &w, &p),
            Verdict::Classified(classify_check_in(at(8, 4), &w, &p))
        );
        assert_eq!(
            classify(EventKind::Out, at(17, 3), &w, &p),
            classify_check_out(at(17, 3), &w, &p)
        );
    }
}
