// Copyright 2025 Alexandre D. Díaz
use actix_web::{get, web, Error as AWError, HttpResponse};

use pokedb::{models::trainer, serialize, Error, Pool};

use crate::db;

#[get("/trainers")]
pub async fn route_list(pool: web::Data<Pool>) -> Result<HttpResponse, AWError> {
    let result = db::run(pool, serialize::trainer_infos).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/trainers/{trainer_id}")]
pub async fn route(pool: web::Data<Pool>, path: web::Path<i64>) -> Result<HttpResponse, AWError> {
    let trainer_id = path.into_inner();
    let result = db::run(pool, move |conn| {
        let trainer = trainer::get_by_id(conn, &trainer_id)?.ok_or(Error::NotFound("Trainer"))?;
        serialize::trainer_info(conn, &trainer)
    })
    .await?;
    Ok(HttpResponse::Ok().json(result))
}
