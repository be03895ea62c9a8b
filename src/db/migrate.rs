use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `employees` table.
fn create_employees_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            dni        TEXT NOT NULL UNIQUE,
            name       TEXT NOT NULL,
            status     TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','inactive')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_employees_status ON employees(status);
        "#,
    )?;
    Ok(())
}

/// Create the `events` table with the modern schema.
///
/// UNIQUE(employee_id, date, kind) is the at-most-one-per-day invariant
/// and the serialization point for double-tap check-ins: a racing second
/// insert fails on the constraint, not on application logic.
fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id   INTEGER NOT NULL REFERENCES employees(id),
            date          TEXT NOT NULL,
            time          TEXT NOT NULL,
            kind          TEXT NOT NULL CHECK(kind IN ('in','out')),
            rule          TEXT NOT NULL,
            justification TEXT,
            category      TEXT,
            task_note     TEXT,
            authorized_by TEXT,
            geofence_ok   INTEGER,
            source        TEXT NOT NULL DEFAULT 'cli',
            meta          TEXT DEFAULT '',
            created_at    TEXT NOT NULL,
            UNIQUE(employee_id, date, kind)
        );

        CREATE INDEX IF NOT EXISTS idx_events_date_time ON events(date, time);
        CREATE INDEX IF NOT EXISTS idx_events_employee_date ON events(employee_id, date);
        "#,
    )?;
    Ok(())
}

/// Create the `counters` table (weekly per-employee scores).
fn create_counters_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS counters (
            employee_id           INTEGER PRIMARY KEY REFERENCES employees(id),
            late_count_week       INTEGER NOT NULL DEFAULT 0,
            points_week           INTEGER NOT NULL DEFAULT 0,
            last_week_start       TEXT,
            last_event_local_date TEXT
        );
        "#,
    )?;
    Ok(())
}

/// Versioned migration: add `points_week` to counters created before the
/// points system landed.
fn migrate_add_points_week_column(conn: &Connection) -> Result<()> {
    let version = "20250610_0001_add_points_week";

    // 1) Already applied?
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(());
    }

    if table_has_column(conn, "counters", "points_week")? {
        // Fresh schema: just mark the migration as applied
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, 'points_week present at creation')",
            [version],
        )?;
        return Ok(());
    }

    // 2) Apply
    conn.execute(
        "ALTER TABLE counters ADD COLUMN points_week INTEGER NOT NULL DEFAULT 0;",
        [],
    )?;

    // 3) Mark as applied
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Added points_week to counters')",
        [version],
    )?;

    success(format!(
        "Migration applied: {} → added 'points_week' to counters table",
        version
    ));

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table (ledger must exist before any versioned step)
    ensure_log_table(conn)?;

    // 2) Base tables
    let employees_existed = table_exists(conn, "employees")?;
    create_employees_table(conn)?;
    create_events_table(conn)?;
    create_counters_table(conn)?;

    if !employees_existed {
        success("Created attendance schema (employees, events, counters).");
    }

    // 3) Versioned column migrations
    migrate_add_points_week_column(conn)?;

    Ok(())
}
