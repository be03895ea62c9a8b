//! Weekly streak tracking: a rolling per-employee late counter that
//! resets on Monday boundaries and fires a one-time HR notice when the
//! tolerated number of lates is first exceeded.

use crate::config::policy::SchedulePolicy;
use crate::core::classifier::RuleTag;
use crate::models::counter::WeeklyScoreCounter;
use crate::utils::date::week_start;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakUpdate {
    pub counter: WeeklyScoreCounter,
    /// True exactly when this event pushed the weekly late count past
    /// the tolerance; never re-fires within the same week.
    pub notice: bool,
}

/// Apply one classified event to the employee's weekly counter.
///
/// The caller owns persistence and must keep the read-modify-write
/// atomic per employee (the store wraps it in a transaction).
pub fn record(
    rule: RuleTag,
    event_date: NaiveDate,
    mut counter: WeeklyScoreCounter,
    policy: &SchedulePolicy,
) -> StreakUpdate {
    let current_week = week_start(event_date);

    if counter.last_week_start != Some(current_week) {
        counter.late_count_week = 0;
        counter.points_week = 0;
        counter.last_week_start = Some(current_week);
    }

    let mut notice = false;

    if rule.counts_as_late() {
        counter.late_count_week += 1;
        notice = counter.late_count_week == policy.streaks.tolerated_lates_per_week + 1;
    }

    counter.points_week += match rule {
        RuleTag::Early => policy.points.early,
        RuleTag::OnTime => policy.points.on_time,
        RuleTag::Overtime => policy.points.overtime,
        _ => 0,
    };

    counter.last_event_local_date = Some(event_date);

    StreakUpdate { counter, notice }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SchedulePolicy {
        SchedulePolicy::default() // tolerated_lates_per_week = 1
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn notice_fires_only_at_the_crossing_point() {
        let p = policy();
        let mut counter = WeeklyScoreCounter::new(1);

        // 1st late of the week: tolerated, no notice
        let up = record(RuleTag::Late, day(2025, 9, 1), counter, &p);
        assert_eq!(up.counter.late_count_week, 1);
        assert!(!up.notice);
        counter = up.counter;

        // 2nd late: threshold exceeded, notice fires once
        let up = record(RuleTag::Late, day(2025, 9, 2), counter, &p);
        assert_eq!(up.counter.late_count_week, 2);
        assert!(up.notice);
        counter = up.counter;

        // 3rd and 4th lates same week: counted, no repeat notice
        let up = record(RuleTag::OutOfRange, day(2025, 9, 3), counter, &p);
        assert_eq!(up.counter.late_count_week, 3);
        assert!(!up.notice);
        counter = up.counter;

        let up = record(RuleTag::Late, day(2025, 9, 4), counter, &p);
        assert_eq!(up.counter.late_count_week, 4);
        assert!(!up.notice);
    }

    #[test]
    fn counter_resets_exactly_once_at_week_boundary() {
        let p = policy();
        let mut counter = WeeklyScoreCounter::new(1);

        // Friday of week 1
        counter = record(RuleTag::Late, day(2025, 9, 5), counter, &p).counter;
        assert_eq!(counter.late_count_week, 1);
        assert_eq!(counter.last_week_start, Some(day(2025, 9, 1)));

        // Saturday same week: no reset
        counter = record(RuleTag::Late, day(2025, 9, 6), counter, &p).counter;
        assert_eq!(counter.late_count_week, 2);

        // Monday of week 2: reset, then this late is the week's first
        counter = record(RuleTag::Late, day(2025, 9, 8), counter, &p).counter;
        assert_eq!(counter.late_count_week, 1);
        assert_eq!(counter.last_week_start, Some(day(2025, 9, 8)));

        // Tuesday week 2: still no reset
        counter = record(RuleTag::OnTime, day(2025, 9, 9), counter, &p).counter;
        assert_eq!(counter.late_count_week, 1);
    }

    #[test]
    fn notice_can_fire_again_in_a_new_week() {
        let p = policy();
        let mut counter = WeeklyScoreCounter::new(1);

        counter = record(RuleTag::Late, day(2025, 9, 1), counter, &p).counter;
        let up = record(RuleTag::Late, day(2025, 9, 2), counter, &p);
        assert!(up.notice);
        counter = up.counter;

        // Next week: tolerance is fresh
        counter = record(RuleTag::Late, day(2025, 9, 8), counter, &p).counter;
        assert_eq!(counter.late_count_week, 1);
        let up = record(RuleTag::Late, day(2025, 9, 9), counter, &p);
        assert!(up.notice);
    }

    #[test]
    fn on_time_and_early_never_touch_the_late_count() {
        let p = policy();
        let mut counter = WeeklyScoreCounter::new(1);
        counter = record(RuleTag::Early, day(2025, 9, 1), counter, &p).counter;
        counter = record(RuleTag::OnTime, day(2025, 9, 2), counter, &p).counter;
        counter = record(RuleTag::OutOfRangeOpen, day(2025, 9, 3), counter, &p).counter;
        assert_eq!(counter.late_count_week, 0);
    }

    #[test]
    fn points_accumulate_per_policy_map() {
        let p = policy();
        let mut counter = WeeklyScoreCounter::new(1);
        counter = record(RuleTag::Early, day(2025, 9, 1), counter, &p).counter; // +3
        counter = record(RuleTag::OnTime, day(2025, 9, 2), counter, &p).counter; // +2
        counter = record(RuleTag::Overtime, day(2025, 9, 2), counter, &p).counter; // +3
        counter = record(RuleTag::Late, day(2025, 9, 3), counter, &p).counter; // +0
        assert_eq!(counter.points_week, 8);

        // Week boundary also resets points
        counter = record(RuleTag::OnTime, day(2025, 9, 8), counter, &p).counter;
        assert_eq!(counter.points_week, 2);
    }

    #[test]
    fn last_event_date_tracks_every_event() {
        let p = policy();
        let counter = WeeklyScoreCounter::new(1);
        let up = record(RuleTag::OnTime, day(2025, 9, 1), counter, &p);
        assert_eq!(up.counter.last_event_local_date, Some(day(2025, 9, 1)));
    }
}
