// Copyright 2025 Alexandre D. Díaz
use rusqlite::{params, ToSql};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{non_empty, Connection};

pub static TABLE_NAME: &str = "habilidades";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Model {
    pub id: i64,
    pub name: String,
    pub power: Option<i64>,
    pub accuracy: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct NewHabilidad {
    pub name: Option<String>,
    pub power: Option<i64>,
    pub accuracy: Option<i64>,
}

pub fn create_table(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute(
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
            id integer primary key,
            name text not null,
            power integer,
            accuracy integer
        )",
            &TABLE_NAME
        )
        .as_str(),
        params![],
    )
}

fn query(conn: &Connection, extra_sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Model>> {
    let sql: String = format!(
        "SELECT hab.id, hab.name, hab.power, hab.accuracy \
    FROM {} as hab \
    {}",
        &TABLE_NAME, &extra_sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok(Model {
            id: row.get(0)?,
            name: row.get(1)?,
            power: row.get(2)?,
            accuracy: row.get(3)?,
        })
    })?;
    let records = rows.collect::<rusqlite::Result<Vec<Model>>>()?;
    Ok(records)
}

pub fn get_all(conn: &Connection) -> Result<Vec<Model>> {
    query(conn, "ORDER BY hab.id", params![])
}

pub fn get_by_id(conn: &Connection, habilidad_id: &i64) -> Result<Option<Model>> {
    let habilidades = query(conn, "WHERE hab.id = ?1 LIMIT 1", params![&habilidad_id])?;
    Ok(habilidades.into_iter().next())
}

pub fn exists(conn: &Connection, habilidad_id: &i64) -> Result<bool> {
    Ok(get_by_id(conn, habilidad_id)?.is_some())
}

/// Only reachable from the admin screens.
pub fn create(conn: &Connection, new_habilidad: &NewHabilidad) -> Result<Model> {
    let name = non_empty(&new_habilidad.name).ok_or(Error::MissingData)?;
    conn.execute(
        format!(
            "INSERT INTO {}(name, power, accuracy) VALUES (?1, ?2, ?3)",
            &TABLE_NAME
        )
        .as_str(),
        params![&name, &new_habilidad.power, &new_habilidad.accuracy],
    )?;
    log::info!("habilidad '{}' created", &name);
    Ok(Model {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        power: new_habilidad.power,
        accuracy: new_habilidad.accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pool;

    #[test]
    fn create_and_fetch() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let thunderbolt = create(
            &conn,
            &NewHabilidad {
                name: Some("Thunderbolt".to_string()),
                power: Some(90),
                accuracy: None,
            },
        )
        .unwrap();
        let fetched = get_by_id(&conn, &thunderbolt.id).unwrap().unwrap();
        assert_eq!(fetched.power, Some(90));
        assert_eq!(fetched.accuracy, None);
        assert!(get_by_id(&conn, &(thunderbolt.id + 1)).unwrap().is_none());
    }
}
