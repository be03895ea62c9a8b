//! Maintenance helpers that rebuild derived state from the event log.

use crate::config::policy::SchedulePolicy;
use crate::core::classifier::RuleTag;
use crate::core::streak;
use crate::db::pool::DbPool;
use crate::db::queries::{map_event_row, upsert_counter};
use crate::errors::AppResult;
use crate::models::counter::WeeklyScoreCounter;

/// Recompute every employee's weekly counter by replaying the event log
/// in order. Used after manual fixes to the events table; the replay
/// applies the same streak rules as live recording.
pub fn rebuild_week_counters(pool: &mut DbPool, policy: &SchedulePolicy) -> AppResult<usize> {
    let employee_ids: Vec<i64> = {
        let mut stmt = pool
            .conn
            .prepare("SELECT DISTINCT employee_id FROM events ORDER BY employee_id ASC")?;

        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    let mut rebuilt = 0;

    for employee_id in employee_ids {
        let events = {
            let mut stmt = pool.conn.prepare(
                "SELECT * FROM events
                 WHERE employee_id = ?1
                 ORDER BY date ASC, time ASC",
            )?;
            let rows = stmt.query_map([employee_id], map_event_row)?;

            let mut v = Vec::new();
            for r in rows {
                v.push(r?);
            }
            v
        };

        let mut counter = WeeklyScoreCounter::new(employee_id);
        for ev in &events {
            let Some(rule) = RuleTag::from_db_str(&ev.rule) else {
                continue; // unknown tag from a future version, skip
            };
            counter = streak::record(rule, ev.date, counter, policy).counter;
        }

        upsert_counter(&pool.conn, &counter)?;
        rebuilt += 1;
    }

    Ok(rebuilt)
}
