use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TEST_LAST5, init_db_with_employee, mj, setup_test_db, write_policy_with_fence};

// Fence: 5 km around Tegucigalpa. San Pedro Sula is far outside.
const INSIDE: (&str, &str) = ("14.0723", "-87.1921");
const OUTSIDE: (&str, &str) = ("15.1999", "-87.7940");

#[test]
fn test_inside_fence_records_normally() {
    let db_path = setup_test_db("fence_inside");
    let policy = write_policy_with_fence("fence_inside", 5000.0);
    init_db_with_employee(&db_path);

    mj()
        .args([
            "--db",
            &db_path,
            "--policy",
            &policy,
            "in",
            TEST_LAST5,
            "--at",
            "2025-09-01 08:00",
            "--lat",
            INSIDE.0,
            "--lon",
            INSIDE.1,
        ])
        .assert()
        .success()
        .stdout(contains("Registro ok"));
}

#[test]
fn test_public_caller_outside_fence_is_blocked() {
    let db_path = setup_test_db("fence_public_block");
    let policy = write_policy_with_fence("fence_public_block", 5000.0);
    init_db_with_employee(&db_path);

    mj()
        .args([
            "--db",
            &db_path,
            "--policy",
            &policy,
            "in",
            TEST_LAST5,
            "--at",
            "2025-09-01 08:00",
            "--lat",
            OUTSIDE.0,
            "--lon",
            OUTSIDE.1,
        ])
        .assert()
        .success()
        .stdout(contains("fuera del área autorizada"));

    // Blocked: no event written
    mj()
        .args(["--db", &db_path, "list", "--period", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("No events recorded"));
}

#[test]
fn test_admin_caller_outside_fence_is_flagged_not_blocked() {
    let db_path = setup_test_db("fence_admin_flag");
    let policy = write_policy_with_fence("fence_admin_flag", 5000.0);
    init_db_with_employee(&db_path);

    mj()
        .args([
            "--db",
            &db_path,
            "--policy",
            &policy,
            "in",
            TEST_LAST5,
            "--at",
            "2025-09-01 08:00",
            "--lat",
            OUTSIDE.0,
            "--lon",
            OUTSIDE.1,
            "--admin",
        ])
        .assert()
        .success()
        .stdout(contains("Registro ok"));

    // Recorded, but carrying the audit flag
    mj()
        .args(["--db", &db_path, "list", "--period", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("geofence"));

    mj()
        .args(["--db", &db_path, "list", "--period", "2025-09-01", "--json"])
        .assert()
        .success()
        .stdout(contains("\"geofence_ok\": false"));
}

#[test]
fn test_missing_coordinates_with_fence_block_public_caller() {
    let db_path = setup_test_db("fence_no_coords");
    let policy = write_policy_with_fence("fence_no_coords", 5000.0);
    init_db_with_employee(&db_path);

    mj()
        .args([
            "--db",
            &db_path,
            "--policy",
            &policy,
            "in",
            TEST_LAST5,
            "--at",
            "2025-09-01 08:00",
        ])
        .assert()
        .success()
        .stdout(contains("fuera del área autorizada"));
}

#[test]
fn test_no_fence_ignores_coordinates() {
    let db_path = setup_test_db("fence_absent");
    init_db_with_employee(&db_path);

    mj()
        .args([
            "--db",
            &db_path,
            "in",
            TEST_LAST5,
            "--at",
            "2025-09-01 08:00",
            "--lat",
            OUTSIDE.0,
            "--lon",
            OUTSIDE.1,
        ])
        .assert()
        .success()
        .stdout(contains("Registro ok"))
        .stdout(contains("fuera del área").not());
}

#[test]
fn test_lat_without_lon_is_an_input_error() {
    let db_path = setup_test_db("fence_half_coords");
    init_db_with_employee(&db_path);

    mj()
        .args([
            "--db",
            &db_path,
            "in",
            TEST_LAST5,
            "--at",
            "2025-09-01 08:00",
            "--lat",
            INSIDE.0,
        ])
        .assert()
        .failure()
        .stderr(contains("--lat and --lon must be given together"));
}
