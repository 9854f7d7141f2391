// Copyright 2025 Alexandre D. Díaz
pub mod favourites;
pub mod habilidades;
pub mod pokemons;
pub mod trainers;
pub mod users;

use actix_web::web;

use crate::error::json_error_handler;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(users::route_list)
        .service(users::route)
        .service(users::route_create)
        .service(pokemons::route_list)
        .service(pokemons::route)
        .service(pokemons::route_create)
        .service(habilidades::route_list)
        .service(habilidades::route)
        .service(trainers::route_list)
        .service(trainers::route)
        .service(favourites::route_list)
        .service(favourites::route_create)
        .service(favourites::route_delete);
}
