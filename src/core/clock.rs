//! High-level business logic for the `in` / `out` commands: the handler
//! layer around the pure classification engine.
//!
//! Order of checks mirrors the registration flow: employee lookup,
//! duplicate/orphan detection, geofence, schedule resolution,
//! classification, streak update, persistence. Everything that touches
//! the database for one clock attempt runs inside a single transaction,
//! so the counter read-modify-write is serialized per employee and a
//! racing duplicate insert dies on the UNIQUE constraint.

use crate::config::policy::SchedulePolicy;
use crate::core::classifier::{self, Classification, RequiredAction, Verdict};
use crate::core::geofence;
use crate::core::resolver::{self, DayResolution};
use crate::core::streak;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::clock_event::ClockEvent;
use crate::models::employee::Employee;
use crate::models::event_kind::EventKind;
use crate::models::geofence::{CallerRole, GeoPoint};
use crate::models::justification::JustificationCategory;
use crate::models::message_key::MessageKey;
use chrono::NaiveDateTime;

pub struct ClockRequest {
    /// Full DNI or its trailing digits.
    pub fragment: String,
    pub kind: EventKind,
    /// Local override for the event instant; defaults to the policy's
    /// local now. Used by tests and backfills.
    pub at: Option<NaiveDateTime>,
    pub point: Option<GeoPoint>,
    pub role: CallerRole,
    pub justification: Option<String>,
    pub category: Option<JustificationCategory>,
    pub task_note: Option<String>,
    pub authorized_by: Option<String>,
    pub source: String,
}

/// Terminal, user-facing result of one clock attempt. Never an error:
/// blocked and duplicate outcomes carry their message key like any
/// other classification.
#[derive(Debug)]
pub struct ClockOutcome {
    pub employee: Employee,
    pub when: NaiveDateTime,
    pub key: MessageKey,
    pub classification: Option<Classification>,
    /// False when nothing was written (blocked, duplicate, missing input).
    pub recorded: bool,
    /// Input the employee still has to supply before the event can be
    /// recorded (justification, task note or manager sign-off).
    pub missing: Option<RequiredAction>,
    /// The weekly late tolerance was exceeded by this very event.
    pub notice: bool,
    /// Check-out without a same-day check-in; recorded but flagged.
    pub orphan: bool,
}

impl ClockOutcome {
    fn refused(employee: Employee, when: NaiveDateTime, key: MessageKey) -> Self {
        Self {
            employee,
            when,
            key,
            classification: None,
            recorded: false,
            missing: None,
            notice: false,
            orphan: false,
        }
    }
}

pub struct ClockLogic;

impl ClockLogic {
    pub fn apply(
        pool: &mut DbPool,
        policy: &SchedulePolicy,
        req: &ClockRequest,
    ) -> AppResult<ClockOutcome> {
        let tx = pool.conn.transaction()?;

        // ------------------------------------------------
        // 1️⃣ Employee lookup (active, unambiguous)
        // ------------------------------------------------
        let employee = queries::find_employee_by_fragment(&tx, &req.fragment)?;

        // ------------------------------------------------
        // 2️⃣ Resolve the local instant, once
        // ------------------------------------------------
        let now = req.at.unwrap_or_else(|| policy.local_now());
        let date = now.date();

        // ------------------------------------------------
        // 3️⃣ Duplicate detection (terminal for the day)
        // ------------------------------------------------
        if queries::find_event(&tx, employee.id, date, req.kind)?.is_some() {
            return Ok(ClockOutcome::refused(
                employee,
                now,
                MessageKey::DuplicateRecord,
            ));
        }

        let orphan = req.kind.is_out()
            && queries::find_event(&tx, employee.id, date, EventKind::In)?.is_none();

        // ------------------------------------------------
        // 4️⃣ Geofence gate
        // ------------------------------------------------
        let fence_verdict =
            geofence::validate(req.point.as_ref(), policy.geofence.as_ref(), req.role);

        if fence_verdict.is_blocked() {
            ttlog(
                &tx,
                "geofence_block",
                &employee.dni,
                "Clock attempt outside the company geofence",
            )?;
            tx.commit()?;
            return Ok(ClockOutcome::refused(
                employee,
                now,
                MessageKey::GeofenceFailed,
            ));
        }

        // ------------------------------------------------
        // 5️⃣ Schedule resolution
        // ------------------------------------------------
        let window = match resolver::resolve(policy, date)? {
            DayResolution::Open(w) => w,
            DayResolution::Closed => {
                return Ok(ClockOutcome::refused(employee, now, MessageKey::ClosedDay));
            }
        };

        // ------------------------------------------------
        // 6️⃣ Classification
        // ------------------------------------------------
        let classification = match classifier::classify(req.kind, now, &window, policy) {
            Verdict::Classified(c) => c,
            Verdict::Blocked(key) => {
                return Ok(ClockOutcome::refused(employee, now, key));
            }
        };

        // ------------------------------------------------
        // 7️⃣ Required input present?
        // ------------------------------------------------
        let missing = match classification.required_action() {
            Some(RequiredAction::Justification) if req.justification.is_none() => {
                Some(RequiredAction::Justification)
            }
            Some(RequiredAction::TaskNote) if req.task_note.is_none() => {
                Some(RequiredAction::TaskNote)
            }
            Some(RequiredAction::Authorization) if req.authorized_by.is_none() => {
                Some(RequiredAction::Authorization)
            }
            _ => None,
        };

        if missing.is_some() {
            // Nothing is written: the employee retries with the input.
            return Ok(ClockOutcome {
                employee,
                when: now,
                key: classification.message_key(),
                classification: Some(classification),
                recorded: false,
                missing,
                notice: false,
                orphan,
            });
        }

        // ------------------------------------------------
        // 8️⃣ Weekly streak update (atomic with the insert)
        // ------------------------------------------------
        let counter = queries::load_counter(&tx, employee.id)?;
        let update = streak::record(classification.rule, date, counter, policy);
        queries::upsert_counter(&tx, &update.counter)?;

        // ------------------------------------------------
        // 9️⃣ Persist the event
        // ------------------------------------------------
        let mut event = ClockEvent::new(
            employee.id,
            date,
            now.time(),
            req.kind,
            classification.rule.as_str().to_string(),
        );
        event.justification = req.justification.clone();
        event.category = req.category.map(|c| c.code().to_string());
        event.task_note = req.task_note.clone();
        event.authorized_by = req.authorized_by.clone();
        event.geofence_ok = fence_verdict.geofence_ok();
        event.source = req.source.clone();
        if orphan {
            event.flags.push("orphan_checkout".to_string());
        }
        if update.notice {
            event.flags.push("three_lates_notice".to_string());
        }

        queries::insert_event(&tx, &event)?;

        // ------------------------------------------------
        // 🔟 Audit trail for flagged outcomes
        // ------------------------------------------------
        if classification.requires_authorization {
            ttlog(
                &tx,
                "authorization",
                &employee.dni,
                &format!(
                    "Out-of-range {} authorized by {}",
                    req.kind.to_db_str(),
                    req.authorized_by.as_deref().unwrap_or("?")
                ),
            )?;
        }
        if event.geofence_ok == Some(false) {
            ttlog(
                &tx,
                "geofence_flag",
                &employee.dni,
                "Admin clock event outside the company geofence",
            )?;
        }
        if orphan {
            ttlog(
                &tx,
                "orphan_checkout",
                &employee.dni,
                "Check-out recorded without a same-day check-in",
            )?;
        }
        if update.notice {
            ttlog(
                &tx,
                "notice",
                &employee.dni,
                &format!(
                    "Weekly late tolerance exceeded ({} lates this week)",
                    update.counter.late_count_week
                ),
            )?;
        }

        tx.commit()?;

        Ok(ClockOutcome {
            employee,
            when: now,
            key: classification.message_key(),
            classification: Some(classification),
            recorded: true,
            missing: None,
            notice: update.notice,
            orphan,
        })
    }
}
