use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::clock_event::ClockEvent;
use crate::models::counter::WeeklyScoreCounter;
use crate::models::employee::{Employee, EmployeeStatus};
use crate::models::event_kind::EventKind;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

// ---------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------

pub fn map_event_row(row: &Row) -> Result<ClockEvent> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let time = NaiveTime::parse_from_str(&time_str, "%H:%M").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(time_str.clone())),
        )
    })?;

    let kind_str: String = row.get("kind")?;
    let kind = EventKind::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidEventKind(kind_str.clone())),
        )
    })?;

    let geofence_ok: Option<i32> = row.get("geofence_ok")?;
    let meta: String = row.get::<_, Option<String>>("meta")?.unwrap_or_default();

    Ok(ClockEvent {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        date,
        time,
        kind,
        rule: row.get("rule")?,
        justification: row.get("justification")?,
        category: row.get("category")?,
        task_note: row.get("task_note")?,
        authorized_by: row.get("authorized_by")?,
        geofence_ok: geofence_ok.map(|v| v == 1),
        flags: ClockEvent::flags_from_json(&meta),
        source: row.get("source")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_event(conn: &Connection, ev: &ClockEvent) -> AppResult<()> {
    conn.execute(
        "INSERT INTO events (employee_id, date, time, kind, rule, justification, category,
                             task_note, authorized_by, geofence_ok, source, meta, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            ev.employee_id,
            ev.date_str(),
            ev.time_str(),
            ev.kind.to_db_str(),
            ev.rule,
            ev.justification,
            ev.category,
            ev.task_note,
            ev.authorized_by,
            ev.geofence_ok.map(|v| if v { 1 } else { 0 }),
            ev.source,
            ev.flags_json(),
            ev.created_at,
        ],
    )?;
    Ok(())
}

/// The duplicate-detection primitive: the event of `kind` already
/// recorded for this employee on this local day, if any.
pub fn find_event(
    conn: &Connection,
    employee_id: i64,
    date: NaiveDate,
    kind: EventKind,
) -> AppResult<Option<ClockEvent>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM events
         WHERE employee_id = ?1 AND date = ?2 AND kind = ?3
         LIMIT 1",
    )?;

    let ev = stmt
        .query_row(
            params![
                employee_id,
                date.format("%Y-%m-%d").to_string(),
                kind.to_db_str()
            ],
            map_event_row,
        )
        .optional()?;

    Ok(ev)
}

pub fn load_events_for_dates(
    pool: &mut DbPool,
    dates: &[NaiveDate],
) -> AppResult<Vec<ClockEvent>> {
    if dates.is_empty() {
        return Ok(Vec::new());
    }

    let date_strings: Vec<String> = dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    let placeholders = vec!["?"; date_strings.len()].join(",");

    let sql = format!(
        "SELECT * FROM events WHERE date IN ({}) ORDER BY date ASC, time ASC",
        placeholders
    );

    let params: Vec<&dyn rusqlite::ToSql> = date_strings
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();

    let mut stmt = pool.conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params), map_event_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------

pub fn map_employee_row(row: &Row) -> Result<Employee> {
    let status_str: String = row.get("status")?;
    let status = EmployeeStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid status: {}", status_str))),
        )
    })?;

    Ok(Employee {
        id: row.get("id")?,
        dni: row.get("dni")?,
        name: row.get("name")?,
        status,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_employee(conn: &Connection, emp: &Employee) -> AppResult<i64> {
    let inserted = conn.execute(
        "INSERT INTO employees (dni, name, status, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![emp.dni, emp.name, emp.status.to_db_str(), emp.created_at],
    );

    match inserted {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AppError::DuplicateEmployee(emp.dni.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Lookup by full DNI or trailing fragment (kiosk flow: the employee
/// types the last digits). More than one active match must be rejected,
/// never guessed.
pub fn find_employee_by_fragment(conn: &Connection, fragment: &str) -> AppResult<Employee> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM employees
         WHERE dni = ?1 OR dni LIKE '%' || ?1
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([fragment], map_employee_row)?;

    let mut matches: Vec<Employee> = Vec::new();
    for r in rows {
        matches.push(r?);
    }

    // An exact DNI always wins over fragment matches.
    if let Some(exact) = matches.iter().find(|e| e.dni == fragment) {
        if !exact.status.is_active() {
            return Err(AppError::InactiveEmployee(exact.name.clone()));
        }
        return Ok(exact.clone());
    }

    let active: Vec<&Employee> = matches.iter().filter(|e| e.status.is_active()).collect();

    match active.len() {
        0 => {
            if matches.is_empty() {
                Err(AppError::EmployeeNotFound(fragment.to_string()))
            } else {
                Err(AppError::InactiveEmployee(matches[0].name.clone()))
            }
        }
        1 => Ok(active[0].clone()),
        _ => Err(AppError::AmbiguousEmployee(fragment.to_string())),
    }
}

pub fn list_employees(pool: &mut DbPool) -> AppResult<Vec<Employee>> {
    let mut stmt = pool
        .conn
        .prepare("SELECT * FROM employees ORDER BY name ASC")?;

    let rows = stmt.query_map([], map_employee_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_employee_status(
    conn: &Connection,
    dni: &str,
    status: EmployeeStatus,
) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE employees SET status = ?1 WHERE dni = ?2",
        params![status.to_db_str(), dni],
    )?;

    if changed == 0 {
        return Err(AppError::EmployeeNotFound(dni.to_string()));
    }
    Ok(())
}

pub fn employee_name(conn: &Connection, employee_id: i64) -> AppResult<String> {
    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM employees WHERE id = ?1",
            [employee_id],
            |row| row.get(0),
        )
        .optional()?;

    name.ok_or_else(|| AppError::EmployeeNotFound(employee_id.to_string()))
}

// ---------------------------------------------------------------------
// Weekly counters
// ---------------------------------------------------------------------

pub fn load_counter(conn: &Connection, employee_id: i64) -> AppResult<WeeklyScoreCounter> {
    let mut stmt = conn.prepare_cached(
        "SELECT employee_id, late_count_week, points_week, last_week_start, last_event_local_date
         FROM counters WHERE employee_id = ?1",
    )?;

    let counter = stmt
        .query_row([employee_id], |row| {
            let week_start: Option<String> = row.get(3)?;
            let last_date: Option<String> = row.get(4)?;
            Ok(WeeklyScoreCounter {
                employee_id: row.get(0)?,
                late_count_week: row.get(1)?,
                points_week: row.get(2)?,
                last_week_start: week_start
                    .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
                last_event_local_date: last_date
                    .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            })
        })
        .optional()?;

    Ok(counter.unwrap_or_else(|| WeeklyScoreCounter::new(employee_id)))
}

pub fn upsert_counter(conn: &Connection, counter: &WeeklyScoreCounter) -> AppResult<()> {
    conn.execute(
        "INSERT INTO counters (employee_id, late_count_week, points_week, last_week_start, last_event_local_date)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(employee_id) DO UPDATE SET
             late_count_week = excluded.late_count_week,
             points_week = excluded.points_week,
             last_week_start = excluded.last_week_start,
             last_event_local_date = excluded.last_event_local_date",
        params![
            counter.employee_id,
            counter.late_count_week,
            counter.points_week,
            counter
                .last_week_start
                .map(|d| d.format("%Y-%m-%d").to_string()),
            counter
                .last_event_local_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
        ],
    )?;
    Ok(())
}

