// Copyright 2025 Alexandre D. Díaz
//! JSON shapes of every entity. Related rows are resolved to display names
//! and users never carry their password.
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{favourite, habilidad, pokemon, trainer, user, Connection};
use crate::utils::date::sqlite_datetime_to_iso;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FavouriteInfo {
    pub user: String,
    pub pokemon: Option<String>,
    pub habilidad: Option<String>,
    pub trainer: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub created_at: String,
    pub favourites: Vec<FavouriteInfo>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PokemonInfo {
    pub id: i64,
    pub name: String,
    pub pokemon_type: Option<String>,
    pub is_legendary: bool,
    pub favourited_by: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HabilidadInfo {
    pub id: i64,
    pub name: String,
    pub power: Option<i64>,
    pub accuracy: Option<i64>,
    pub favourited_by: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrainerInfo {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
    pub hometown: Option<String>,
    pub favourited_by: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MessageInfo {
    pub message: String,
}

pub fn favourite_info(fav: &favourite::Model) -> FavouriteInfo {
    FavouriteInfo {
        user: fav.user_id.1.clone(),
        pokemon: fav.pokemon_id.as_ref().map(|x| x.1.clone()),
        habilidad: fav.habilidad_id.as_ref().map(|x| x.1.clone()),
        trainer: fav.trainer_id.as_ref().map(|x| x.1.clone()),
    }
}

pub fn favourite_infos(conn: &Connection) -> Result<Vec<FavouriteInfo>> {
    Ok(favourite::get_all(conn)?.iter().map(favourite_info).collect())
}

pub fn user_info(conn: &Connection, model: &user::Model) -> Result<UserInfo> {
    let favourites = favourite::get_by_user_id(conn, &model.id)?
        .iter()
        .map(favourite_info)
        .collect();
    Ok(UserInfo {
        id: model.id,
        username: model.username.clone(),
        email: model.email.clone(),
        firstname: model.firstname.clone(),
        lastname: model.lastname.clone(),
        created_at: sqlite_datetime_to_iso(&model.created_at),
        favourites,
    })
}

pub fn user_infos(conn: &Connection) -> Result<Vec<UserInfo>> {
    user::get_all(conn)?
        .iter()
        .map(|x| user_info(conn, x))
        .collect()
}

pub fn pokemon_info(conn: &Connection, model: &pokemon::Model) -> Result<PokemonInfo> {
    Ok(PokemonInfo {
        id: model.id,
        name: model.name.clone(),
        pokemon_type: model.pokemon_type.clone(),
        is_legendary: model.is_legendary,
        favourited_by: favourite::get_usernames_by_pokemon_id(conn, &model.id)?,
    })
}

pub fn pokemon_infos(conn: &Connection) -> Result<Vec<PokemonInfo>> {
    pokemon::get_all(conn)?
        .iter()
        .map(|x| pokemon_info(conn, x))
        .collect()
}

pub fn habilidad_info(conn: &Connection, model: &habilidad::Model) -> Result<HabilidadInfo> {
    Ok(HabilidadInfo {
        id: model.id,
        name: model.name.clone(),
        power: model.power,
        accuracy: model.accuracy,
        favourited_by: favourite::get_usernames_by_habilidad_id(conn, &model.id)?,
    })
}

pub fn habilidad_infos(conn: &Connection) -> Result<Vec<HabilidadInfo>> {
    habilidad::get_all(conn)?
        .iter()
        .map(|x| habilidad_info(conn, x))
        .collect()
}

pub fn trainer_info(conn: &Connection, model: &trainer::Model) -> Result<TrainerInfo> {
    Ok(TrainerInfo {
        id: model.id,
        name: model.name.clone(),
        age: model.age,
        hometown: model.hometown.clone(),
        favourited_by: favourite::get_usernames_by_trainer_id(conn, &model.id)?,
    })
}

pub fn trainer_infos(conn: &Connection) -> Result<Vec<TrainerInfo>> {
    trainer::get_all(conn)?
        .iter()
        .map(|x| trainer_info(conn, x))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{favourite::NewFavourite, pokemon::NewPokemon, user::NewUser};
    use crate::test_pool;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            email: Some(format!("{}@kanto.org", name)),
            password: Some("secret".to_string()),
            username: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn user_never_exposes_password() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let model = user::create(&conn, &new_user("gary")).unwrap();
        let value = serde_json::to_value(user_info(&conn, &model).unwrap()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert!(!keys.iter().any(|x| x.as_str() == "password"));
        assert_eq!(value["username"], "gary");
        assert_eq!(value["firstname"], serde_json::Value::Null);
        assert!(value["created_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn pokemon_lists_who_favourited_it() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let gary = user::create(&conn, &new_user("gary")).unwrap();
        let ash = user::create(&conn, &new_user("ash")).unwrap();
        let eevee = pokemon::create(
            &conn,
            &NewPokemon {
                name: Some("Eevee".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(pokemon_info(&conn, &eevee).unwrap().favourited_by.is_empty());
        for user_id in [gary.id, ash.id] {
            favourite::create(
                &conn,
                &NewFavourite {
                    user_id: Some(user_id),
                    pokemon_id: Some(eevee.id),
                    ..Default::default()
                },
            )
            .unwrap();
        }
        let info = pokemon_info(&conn, &eevee).unwrap();
        assert_eq!(info.favourited_by, vec!["gary", "ash"]);

        let favourites = favourite_infos(&conn).unwrap();
        assert_eq!(
            favourites[0],
            FavouriteInfo {
                user: "gary".to_string(),
                pokemon: Some("Eevee".to_string()),
                habilidad: None,
                trainer: None,
            }
        );
        let users = user_infos(&conn).unwrap();
        assert_eq!(users[1].favourites.len(), 1);
        assert_eq!(users[1].favourites[0].pokemon.as_deref(), Some("Eevee"));
    }
}
