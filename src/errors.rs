//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.
//!
//! Policy outcomes (late, overtime, geofence block, duplicate record…)
//! are NOT errors: the classifier returns them as values. Everything in
//! here is an I/O failure or a configuration problem that must stop the
//! clock attempt and point the user to an administrator.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid event kind: {0}")]
    InvalidEventKind(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid justification category: {0}")]
    InvalidCategory(String),

    // ---------------------------
    // Employee lookup
    // ---------------------------
    #[error("No active employee matches '{0}'")]
    EmployeeNotFound(String),

    #[error("More than one employee matches '{0}', use the full DNI")]
    AmbiguousEmployee(String),

    #[error("Employee '{0}' is inactive")]
    InactiveEmployee(String),

    #[error("Employee with DNI '{0}' already exists")]
    DuplicateEmployee(String),

    // ---------------------------
    // Config errors (fatal for a clock attempt — contact an admin)
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No schedule entry for {0}")]
    ScheduleMissing(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
