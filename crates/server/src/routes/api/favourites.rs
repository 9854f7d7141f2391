// Copyright 2025 Alexandre D. Díaz
use actix_web::{delete, get, post, web, Error as AWError, HttpResponse};

use pokedb::{
    models::favourite::{self, FavouritePokemonKey, NewFavourite},
    serialize::{self, MessageInfo},
    Pool,
};

use crate::db;

#[get("/favourites")]
pub async fn route_list(pool: web::Data<Pool>) -> Result<HttpResponse, AWError> {
    let result = db::run(pool, serialize::favourite_infos).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/favourites")]
pub async fn route_create(
    pool: web::Data<Pool>,
    info: web::Json<NewFavourite>,
) -> Result<HttpResponse, AWError> {
    let new_favourite = info.into_inner();
    let result = db::run(pool, move |conn| {
        let fav = favourite::create(conn, &new_favourite)?;
        Ok(serialize::favourite_info(&fav))
    })
    .await?;
    Ok(HttpResponse::Created().json(result))
}

#[delete("/favourites")]
pub async fn route_delete(
    pool: web::Data<Pool>,
    info: web::Json<FavouritePokemonKey>,
) -> Result<HttpResponse, AWError> {
    let key = info.into_inner();
    db::run(pool, move |conn| favourite::delete_by_user_id_pokemon_id(conn, &key)).await?;
    Ok(HttpResponse::Ok().json(MessageInfo {
        message: "Removed".to_string(),
    }))
}
