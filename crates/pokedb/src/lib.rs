// Copyright 2025 Alexandre D. Díaz
pub mod error;
pub mod models;
pub mod serialize;
pub mod utils;

use std::fs;
use std::path::{Path, PathBuf};

use r2d2_sqlite::SqliteConnectionManager;

pub use error::{Error, Result};

pub type Pool = r2d2::Pool<SqliteConnectionManager>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Accepts `sqlite:///path`, `sqlite://path`, `:memory:`, `sqlite::memory:`
    /// or a plain path. Server databases are rejected.
    pub fn parse(url: &str) -> Result<DatabaseLocation> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::UnsupportedDatabase(url.to_string()));
        }
        if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
        {
            return Err(Error::UnsupportedDatabase(url.to_string()));
        }
        let path = url
            .strip_prefix("sqlite:///")
            .or_else(|| url.strip_prefix("sqlite://"))
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        if path.is_empty() {
            return Err(Error::UnsupportedDatabase(url.to_string()));
        }
        if path == ":memory:" {
            return Ok(DatabaseLocation::Memory);
        }
        Ok(DatabaseLocation::File(PathBuf::from(path)))
    }
}

fn connection_manager(location: &DatabaseLocation) -> SqliteConnectionManager {
    let manager = match location {
        DatabaseLocation::Memory => SqliteConnectionManager::memory(),
        DatabaseLocation::File(path) => SqliteConnectionManager::file(path),
    };
    manager.with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"))
}

/// Builds the connection pool and makes sure the schema exists.
///
/// Every in-memory connection is its own database, so a memory pool keeps a
/// single connection alive for the whole process.
pub fn open_pool(location: &DatabaseLocation, max_size: u32) -> Result<Pool> {
    let builder = match location {
        DatabaseLocation::Memory => Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None),
        DatabaseLocation::File(path) => {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        Error::UnsupportedDatabase(format!("{}: {}", path.display(), err))
                    })?;
                }
            }
            Pool::builder().max_size(max_size.max(1))
        }
    };
    let pool = builder.build(connection_manager(location))?;
    let conn = pool.get()?;
    models::prepare_schema(&conn)?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) fn test_pool() -> Pool {
    open_pool(&DatabaseLocation::Memory, 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_urls() {
        assert_eq!(
            DatabaseLocation::parse("sqlite:////tmp/test.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("/tmp/test.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite:///data/data.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("data/data.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("data.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("data.db"))
        );
        assert_eq!(DatabaseLocation::parse(":memory:").unwrap(), DatabaseLocation::Memory);
        assert_eq!(DatabaseLocation::parse("sqlite::memory:").unwrap(), DatabaseLocation::Memory);
    }

    #[test]
    fn rejects_server_databases() {
        assert!(matches!(
            DatabaseLocation::parse("postgres://u:p@localhost/db"),
            Err(Error::UnsupportedDatabase(_))
        ));
        assert!(matches!(DatabaseLocation::parse(""), Err(Error::UnsupportedDatabase(_))));
    }

    #[test]
    fn memory_pool_has_schema() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' \
                AND name IN ('users', 'pokemons', 'habilidades', 'trainers', 'favourites')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 5);
        let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(fk, 1);
    }
}
