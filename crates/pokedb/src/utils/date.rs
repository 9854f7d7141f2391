// Copyright 2025 Alexandre D. Díaz
use chrono::{DateTime, NaiveDateTime, Utc};

static SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn to_sqlite_datetime(dt: DateTime<Utc>) -> String {
    dt.format(SQLITE_DATETIME_FORMAT).to_string()
}

pub fn get_sqlite_utc_now() -> String {
    to_sqlite_datetime(Utc::now())
}

/// Converts a stored `YYYY-MM-DD HH:MM:SS` value into ISO-8601.
/// Unparseable values are returned untouched.
pub fn sqlite_datetime_to_iso(value: &str) -> String {
    match NaiveDateTime::parse_from_str(value, SQLITE_DATETIME_FORMAT) {
        Ok(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        Err(_) => value.to_string(),
    }
}
