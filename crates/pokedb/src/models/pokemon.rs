// Copyright 2025 Alexandre D. Díaz
use rusqlite::{params, ToSql};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{non_empty, Connection};

pub static TABLE_NAME: &str = "pokemons";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Model {
    pub id: i64,
    pub name: String,
    pub pokemon_type: Option<String>,
    pub is_legendary: bool,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct NewPokemon {
    pub name: Option<String>,
    pub pokemon_type: Option<String>,
    pub is_legendary: Option<bool>,
}

pub fn create_table(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute(
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
            id integer primary key,
            name text not null,
            pokemon_type text,
            is_legendary integer not null default 0
        )",
            &TABLE_NAME
        )
        .as_str(),
        params![],
    )
}

fn query(conn: &Connection, extra_sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Model>> {
    let sql: String = format!(
        "SELECT pk.id, pk.name, pk.pokemon_type, pk.is_legendary \
    FROM {} as pk \
    {}",
        &TABLE_NAME, &extra_sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok(Model {
            id: row.get(0)?,
            name: row.get(1)?,
            pokemon_type: row.get(2)?,
            is_legendary: row.get(3)?,
        })
    })?;
    let records = rows.collect::<rusqlite::Result<Vec<Model>>>()?;
    Ok(records)
}

pub fn get_all(conn: &Connection) -> Result<Vec<Model>> {
    query(conn, "ORDER BY pk.id", params![])
}

pub fn get_by_id(conn: &Connection, pokemon_id: &i64) -> Result<Option<Model>> {
    let pokemons = query(conn, "WHERE pk.id = ?1 LIMIT 1", params![&pokemon_id])?;
    Ok(pokemons.into_iter().next())
}

pub fn exists(conn: &Connection, pokemon_id: &i64) -> Result<bool> {
    Ok(get_by_id(conn, pokemon_id)?.is_some())
}

pub fn create(conn: &Connection, new_pokemon: &NewPokemon) -> Result<Model> {
    let name = non_empty(&new_pokemon.name).ok_or(Error::MissingData)?;
    let pokemon_type = non_empty(&new_pokemon.pokemon_type).map(str::to_string);
    let is_legendary = new_pokemon.is_legendary.unwrap_or(false);
    conn.execute(
        format!(
            "INSERT INTO {}(name, pokemon_type, is_legendary) VALUES (?1, ?2, ?3)",
            &TABLE_NAME
        )
        .as_str(),
        params![&name, &pokemon_type, &is_legendary],
    )?;
    log::info!("pokemon '{}' created", &name);
    Ok(Model {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        pokemon_type,
        is_legendary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pool;

    #[test]
    fn create_with_defaults() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let pikachu = create(
            &conn,
            &NewPokemon {
                name: Some("Pikachu".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let fetched = get_by_id(&conn, &pikachu.id).unwrap().unwrap();
        assert_eq!(fetched, pikachu);
        assert_eq!(fetched.pokemon_type, None);
        assert!(!fetched.is_legendary);
    }

    #[test]
    fn keeps_insertion_order() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        for (name, legendary) in [("Mew", true), ("Eevee", false)] {
            create(
                &conn,
                &NewPokemon {
                    name: Some(name.to_string()),
                    pokemon_type: Some("normal".to_string()),
                    is_legendary: Some(legendary),
                },
            )
            .unwrap();
        }
        let names: Vec<String> = get_all(&conn).unwrap().into_iter().map(|x| x.name).collect();
        assert_eq!(names, vec!["Mew", "Eevee"]);
    }

    #[test]
    fn name_is_required() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let res = create(&conn, &NewPokemon::default());
        assert!(matches!(res, Err(Error::MissingData)));
    }
}
