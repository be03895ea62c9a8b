#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn mj() -> Command {
    cargo_bin_cmd!("marcaje")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_marcaje.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Default test employee: full DNI and the fragment used at the kiosk
pub const TEST_DNI: &str = "08011234567890";
pub const TEST_LAST5: &str = "67890";

/// Initialize DB and register the default test employee
pub fn init_db_with_employee(db_path: &str) {
    mj()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    mj()
        .args([
            "--db",
            db_path,
            "employee",
            "add",
            TEST_DNI,
            "--name",
            "Gustavo Mejía",
        ])
        .assert()
        .success();
}

/// Write a policy file with a Tegucigalpa geofence and return its path
pub fn write_policy_with_fence(name: &str, radius_m: f64) -> String {
    let mut policy = marcaje::config::policy::SchedulePolicy::default();
    policy.geofence = Some(marcaje::models::geofence::GeofenceConfig {
        center_lat: 14.0723,
        center_lon: -87.1921,
        radius_m,
    });

    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_policy.yml", name));
    let p = path.to_string_lossy().to_string();
    fs::write(&p, serde_yaml::to_string(&policy).unwrap()).unwrap();
    p
}
