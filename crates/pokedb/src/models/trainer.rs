// Copyright 2025 Alexandre D. Díaz
use rusqlite::{params, ToSql};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{non_empty, Connection};

pub static TABLE_NAME: &str = "trainers";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Model {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
    pub hometown: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct NewTrainer {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub hometown: Option<String>,
}

pub fn create_table(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute(
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
            id integer primary key,
            name text not null,
            age integer,
            hometown text
        )",
            &TABLE_NAME
        )
        .as_str(),
        params![],
    )
}

fn query(conn: &Connection, extra_sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Model>> {
    let sql: String = format!(
        "SELECT tr.id, tr.name, tr.age, tr.hometown \
    FROM {} as tr \
    {}",
        &TABLE_NAME, &extra_sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok(Model {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            hometown: row.get(3)?,
        })
    })?;
    let records = rows.collect::<rusqlite::Result<Vec<Model>>>()?;
    Ok(records)
}

pub fn get_all(conn: &Connection) -> Result<Vec<Model>> {
    query(conn, "ORDER BY tr.id", params![])
}

pub fn get_by_id(conn: &Connection, trainer_id: &i64) -> Result<Option<Model>> {
    let trainers = query(conn, "WHERE tr.id = ?1 LIMIT 1", params![&trainer_id])?;
    Ok(trainers.into_iter().next())
}

pub fn exists(conn: &Connection, trainer_id: &i64) -> Result<bool> {
    Ok(get_by_id(conn, trainer_id)?.is_some())
}

pub fn create(conn: &Connection, new_trainer: &NewTrainer) -> Result<Model> {
    let name = non_empty(&new_trainer.name).ok_or(Error::MissingData)?;
    let hometown = non_empty(&new_trainer.hometown).map(str::to_string);
    conn.execute(
        format!(
            "INSERT INTO {}(name, age, hometown) VALUES (?1, ?2, ?3)",
            &TABLE_NAME
        )
        .as_str(),
        params![&name, &new_trainer.age, &hometown],
    )?;
    log::info!("trainer '{}' created", &name);
    Ok(Model {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        age: new_trainer.age,
        hometown,
    })
}
