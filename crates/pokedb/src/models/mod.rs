// Copyright 2025 Alexandre D. Díaz
pub mod favourite;
pub mod habilidad;
pub mod pokemon;
pub mod trainer;
pub mod user;

use rusqlite::params;

pub type Connection = r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>;

pub fn prepare_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    user::create_table(conn)?;
    pokemon::create_table(conn)?;
    habilidad::create_table(conn)?;
    trainer::create_table(conn)?;
    favourite::create_table(conn)?;
    Ok(())
}

pub fn count(conn: &Connection, table_name: &str) -> Result<i64, rusqlite::Error> {
    conn.query_row(
        format!("SELECT count(*) FROM {}", table_name).as_str(),
        params![],
        |row| row.get(0),
    )
}

/// Empty strings coming from forms count as absent values.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|x| !x.is_empty())
}
