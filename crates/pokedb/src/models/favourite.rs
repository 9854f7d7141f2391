// Copyright 2025 Alexandre D. Díaz
use rusqlite::{params, ToSql};
use serde::{Deserialize, Serialize};

use crate::error::{is_unique_violation, Error, Result};
use crate::models::{habilidad, pokemon, trainer, user, Connection};

pub static TABLE_NAME: &str = "favourites";

/// References are resolved to `(id, display name)` pairs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Model {
    pub id: i64,
    pub user_id: (i64, String),
    pub pokemon_id: Option<(i64, String)>,
    pub habilidad_id: Option<(i64, String)>,
    pub trainer_id: Option<(i64, String)>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct NewFavourite {
    pub user_id: Option<i64>,
    pub pokemon_id: Option<i64>,
    pub habilidad_id: Option<i64>,
    pub trainer_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct FavouritePokemonKey {
    pub user_id: Option<i64>,
    pub pokemon_id: Option<i64>,
}

pub fn create_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        format!(
            "CREATE TABLE IF NOT EXISTS {0} (
            id integer primary key,
            user_id integer not null references {1}(id),
            pokemon_id integer references {2}(id),
            habilidad_id integer references {3}(id),
            trainer_id integer references {4}(id),
            CONSTRAINT fk_user
                FOREIGN KEY (user_id)
                REFERENCES {1}(id),
            CONSTRAINT fk_pokemon
                FOREIGN KEY (pokemon_id)
                REFERENCES {2}(id),
            CONSTRAINT fk_habilidad
                FOREIGN KEY (habilidad_id)
                REFERENCES {3}(id),
            CONSTRAINT fk_trainer
                FOREIGN KEY (trainer_id)
                REFERENCES {4}(id),
            CONSTRAINT chk_single_target CHECK (
                (pokemon_id IS NOT NULL) + (habilidad_id IS NOT NULL) + (trainer_id IS NOT NULL) = 1
            )
        )",
            &TABLE_NAME,
            &user::TABLE_NAME,
            &pokemon::TABLE_NAME,
            &habilidad::TABLE_NAME,
            &trainer::TABLE_NAME
        )
        .as_str(),
        params![],
    )?;
    for column in ["pokemon_id", "habilidad_id", "trainer_id"] {
        conn.execute(
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS uniq_favourites_user_{1} ON {0}(user_id, {1}) WHERE {1} IS NOT NULL",
                &TABLE_NAME, column
            )
            .as_str(),
            params![],
        )?;
    }
    Ok(())
}

fn query(conn: &Connection, extra_sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Model>> {
    let sql: String = format!(
        "SELECT fav.id, fav.user_id, us.username, fav.pokemon_id, pk.name, \
    fav.habilidad_id, hab.name, fav.trainer_id, tr.name \
    FROM {} as fav \
    INNER JOIN {} as us \
    ON us.id = fav.user_id \
    LEFT JOIN {} as pk \
    ON pk.id = fav.pokemon_id \
    LEFT JOIN {} as hab \
    ON hab.id = fav.habilidad_id \
    LEFT JOIN {} as tr \
    ON tr.id = fav.trainer_id \
    {}",
        &TABLE_NAME,
        &user::TABLE_NAME,
        &pokemon::TABLE_NAME,
        &habilidad::TABLE_NAME,
        &trainer::TABLE_NAME,
        &extra_sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, |row| {
        let pokemon_id: Option<i64> = row.get(3)?;
        let habilidad_id: Option<i64> = row.get(5)?;
        let trainer_id: Option<i64> = row.get(7)?;
        Ok(Model {
            id: row.get(0)?,
            user_id: (row.get(1)?, row.get(2)?),
            pokemon_id: pokemon_id.zip(row.get::<_, Option<String>>(4)?),
            habilidad_id: habilidad_id.zip(row.get::<_, Option<String>>(6)?),
            trainer_id: trainer_id.zip(row.get::<_, Option<String>>(8)?),
        })
    })?;
    let records = rows.collect::<rusqlite::Result<Vec<Model>>>()?;
    Ok(records)
}

pub fn get_all(conn: &Connection) -> Result<Vec<Model>> {
    query(conn, "ORDER BY fav.id", params![])
}

pub fn get_by_id(conn: &Connection, favourite_id: &i64) -> Result<Option<Model>> {
    let favourites = query(conn, "WHERE fav.id = ?1 LIMIT 1", params![&favourite_id])?;
    Ok(favourites.into_iter().next())
}

pub fn get_by_user_id(conn: &Connection, user_id: &i64) -> Result<Vec<Model>> {
    query(conn, "WHERE fav.user_id = ?1 ORDER BY fav.id", params![&user_id])
}

fn get_usernames_by(conn: &Connection, column: &str, id: &i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        format!(
            "SELECT us.username \
        FROM {} as fav \
        INNER JOIN {} as us \
        ON us.id = fav.user_id \
        WHERE fav.{} = ?1 \
        ORDER BY fav.id",
            &TABLE_NAME, &user::TABLE_NAME, column
        )
        .as_str(),
    )?;
    let rows = stmt.query_map(params![&id], |row| row.get(0))?;
    let names = rows.collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

pub fn get_usernames_by_pokemon_id(conn: &Connection, pokemon_id: &i64) -> Result<Vec<String>> {
    get_usernames_by(conn, "pokemon_id", pokemon_id)
}

pub fn get_usernames_by_habilidad_id(
    conn: &Connection,
    habilidad_id: &i64,
) -> Result<Vec<String>> {
    get_usernames_by(conn, "habilidad_id", habilidad_id)
}

pub fn get_usernames_by_trainer_id(conn: &Connection, trainer_id: &i64) -> Result<Vec<String>> {
    get_usernames_by(conn, "trainer_id", trainer_id)
}

/// Inserts a favourite pointing at exactly one pokemon, habilidad or trainer.
/// Every given reference must exist.
pub fn create(conn: &Connection, new_favourite: &NewFavourite) -> Result<Model> {
    let user_id = new_favourite.user_id.ok_or(Error::MissingData)?;
    let targets = [
        new_favourite.pokemon_id,
        new_favourite.habilidad_id,
        new_favourite.trainer_id,
    ];
    if targets.iter().filter(|x| x.is_some()).count() != 1 {
        return Err(Error::Validation(
            "Favourite must reference exactly one of pokemon_id, habilidad_id or trainer_id"
                .to_string(),
        ));
    }
    if !user::exists(conn, &user_id)? {
        return Err(Error::InvalidReference("User"));
    }
    if let Some(pokemon_id) = &new_favourite.pokemon_id {
        if !pokemon::exists(conn, pokemon_id)? {
            return Err(Error::InvalidReference("Pokemon"));
        }
    }
    if let Some(habilidad_id) = &new_favourite.habilidad_id {
        if !habilidad::exists(conn, habilidad_id)? {
            return Err(Error::InvalidReference("Habilidad"));
        }
    }
    if let Some(trainer_id) = &new_favourite.trainer_id {
        if !trainer::exists(conn, trainer_id)? {
            return Err(Error::InvalidReference("Trainer"));
        }
    }
    conn.execute(
        format!(
            "INSERT INTO {}(user_id, pokemon_id, habilidad_id, trainer_id) VALUES (?1, ?2, ?3, ?4)",
            &TABLE_NAME
        )
        .as_str(),
        params![
            &user_id,
            &new_favourite.pokemon_id,
            &new_favourite.habilidad_id,
            &new_favourite.trainer_id
        ],
    )
    .map_err(|err| {
        if is_unique_violation(&err) {
            Error::Conflict("Favourite already exists".to_string())
        } else {
            Error::from(err)
        }
    })?;
    let favourite_id = conn.last_insert_rowid();
    log::info!("favourite {} created for user {}", favourite_id, user_id);
    get_by_id(conn, &favourite_id)?.ok_or(Error::NotFound("Favourite"))
}

pub fn delete_by_user_id_pokemon_id(conn: &Connection, key: &FavouritePokemonKey) -> Result<()> {
    let (user_id, pokemon_id) = match (key.user_id, key.pokemon_id) {
        (Some(user_id), Some(pokemon_id)) => (user_id, pokemon_id),
        _ => return Err(Error::MissingData),
    };
    let removed = conn.execute(
        format!(
            "DELETE FROM {} WHERE user_id = ?1 AND pokemon_id = ?2",
            &TABLE_NAME
        )
        .as_str(),
        params![&user_id, &pokemon_id],
    )?;
    if removed == 0 {
        return Err(Error::NotFound("Favourite"));
    }
    log::info!("pokemon {} removed from user {} favourites", pokemon_id, user_id);
    Ok(())
}

pub fn delete_by_id(conn: &Connection, favourite_id: &i64) -> Result<()> {
    let removed = conn.execute(
        format!("DELETE FROM {} WHERE id = ?1", &TABLE_NAME).as_str(),
        params![&favourite_id],
    )?;
    if removed == 0 {
        return Err(Error::NotFound("Favourite"));
    }
    Ok(())
}
