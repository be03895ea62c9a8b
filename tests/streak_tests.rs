use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TEST_LAST5, init_db_with_employee, mj, setup_test_db};

// Default policy tolerates 1 late per week: the notice fires on the
// 2nd late of the tracked week and never again inside it.

fn late_checkin(db_path: &str, at: &str) -> assert_cmd::assert::Assert {
    mj()
        .args([
            "--db",
            db_path,
            "in",
            TEST_LAST5,
            "--at",
            at,
            "--justify",
            "traffic again",
            "--category",
            "traffic",
        ])
        .assert()
        .success()
}

#[test]
fn test_notice_fires_exactly_once_per_week() {
    let db_path = setup_test_db("streak_notice_once");
    init_db_with_employee(&db_path);

    // 1st late (Mon): tolerated
    late_checkin(&db_path, "2025-09-01 08:12").stdout(contains("tardanzas esta semana").not());

    // 2nd late (Tue): tolerance exceeded, notice fires
    late_checkin(&db_path, "2025-09-02 08:15").stdout(contains("3+ tardanzas esta semana"));

    // 3rd late (Wed): counted, but no repeat notice
    late_checkin(&db_path, "2025-09-03 08:10").stdout(contains("tardanzas esta semana").not());

    // 4th late (Thu): still silent
    late_checkin(&db_path, "2025-09-04 08:18").stdout(contains("tardanzas esta semana").not());

    // The crossing left an audit trail entry, exactly one
    mj()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("Weekly late tolerance exceeded (2 lates this week)"));
}

#[test]
fn test_counter_resets_on_monday_boundary() {
    let db_path = setup_test_db("streak_week_reset");
    init_db_with_employee(&db_path);

    // Two lates in week 1 → notice
    late_checkin(&db_path, "2025-09-04 08:12");
    late_checkin(&db_path, "2025-09-05 08:12").stdout(contains("3+ tardanzas"));

    // Monday of week 2: tolerance is fresh, first late is silent
    late_checkin(&db_path, "2025-09-08 08:12").stdout(contains("tardanzas esta semana").not());

    // Second late of week 2 crosses again
    late_checkin(&db_path, "2025-09-09 08:12").stdout(contains("3+ tardanzas"));
}

#[test]
fn test_on_time_checkins_never_trigger_the_notice() {
    let db_path = setup_test_db("streak_on_time");
    init_db_with_employee(&db_path);

    for at in [
        "2025-09-01 08:00",
        "2025-09-02 08:03",
        "2025-09-03 07:57",
        "2025-09-04 08:05",
    ] {
        mj()
            .args(["--db", &db_path, "in", TEST_LAST5, "--at", at])
            .assert()
            .success()
            .stdout(contains("tardanzas").not());
    }
}

#[test]
fn test_rebuild_counters_replays_the_event_log() {
    let db_path = setup_test_db("streak_rebuild");
    init_db_with_employee(&db_path);

    late_checkin(&db_path, "2025-09-01 08:12");
    late_checkin(&db_path, "2025-09-02 08:15");

    mj()
        .args(["--db", &db_path, "db", "--rebuild-counters"])
        .assert()
        .success()
        .stdout(contains("Rebuilt counters for 1 employee(s)"));
}
