// Copyright 2025 Alexandre D. Díaz
use rusqlite::ffi;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing data")]
    MissingData,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} not found")]
    InvalidReference(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("unsupported database url: {0}")]
    UnsupportedDatabase(String),
    #[error("password hashing: {0}")]
    Hash(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Pool(#[from] r2d2::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// True when SQLite rejected the statement because of a UNIQUE index.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ffi::ErrorCode::ConstraintViolation
                && (failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}
