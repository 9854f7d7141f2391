// Copyright 2025 Alexandre D. Díaz
use actix_web::{get, post, web, Error as AWError, HttpResponse};

use pokedb::{
    models::user::{self, NewUser},
    serialize, Error, Pool,
};

use crate::db;

#[get("/users")]
pub async fn route_list(pool: web::Data<Pool>) -> Result<HttpResponse, AWError> {
    let result = db::run(pool, serialize::user_infos).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/users/{user_id}")]
pub async fn route(pool: web::Data<Pool>, path: web::Path<i64>) -> Result<HttpResponse, AWError> {
    let user_id = path.into_inner();
    let result = db::run(pool, move |conn| {
        let user = user::get_by_id(conn, &user_id)?.ok_or(Error::NotFound("User"))?;
        serialize::user_info(conn, &user)
    })
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/users")]
pub async fn route_create(
    pool: web::Data<Pool>,
    info: web::Json<NewUser>,
) -> Result<HttpResponse, AWError> {
    let new_user = info.into_inner();
    let result = db::run(pool, move |conn| {
        let user = user::create(conn, &new_user)?;
        serialize::user_info(conn, &user)
    })
    .await?;
    Ok(HttpResponse::Created().json(result))
}
