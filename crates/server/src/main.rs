// Copyright 2025 Alexandre D. Díaz
mod app;
mod config;
mod db;
mod error;
mod middlewares;
mod minijinja_renderer;
mod routes;
mod utils;

use std::io;
use std::path::PathBuf;

use actix_web::{cookie::Key, web, HttpServer};

use app::build_app;
use config::SERVER_CONFIG;
use minijinja_renderer::new_reloader;
use pokedb::{open_pool, DatabaseLocation};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // MiniJinja
    if SERVER_CONFIG.get_template_autoreload() {
        log::info!("template auto-reloading is enabled");
    } else {
        log::info!(
            "template auto-reloading is disabled; run with POKEDEX_TEMPLATE_AUTORELOAD=true to enable"
        );
    }
    let tmpl_reloader = web::Data::new(new_reloader(
        PathBuf::from(SERVER_CONFIG.get_template_path()),
        SERVER_CONFIG.get_template_autoreload(),
    ));

    // Secret Key
    let cookie_secret_key = if SERVER_CONFIG.get_cookie_key_bytes().len() < 64 {
        log::warn!("no usable cookie_key configured; admin sessions won't survive a restart");
        Key::generate()
    } else {
        Key::from(SERVER_CONFIG.get_cookie_key_bytes().as_slice())
    };

    // connect to SQLite DB
    let location = DatabaseLocation::parse(SERVER_CONFIG.get_database_url())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    log::info!("using database {:?}", &location);
    let pool = open_pool(&location, *SERVER_CONFIG.get_db_pool_max_size())
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    log::info!(
        "starting HTTP server at http://{}:{}",
        &SERVER_CONFIG.get_bind_address(),
        &SERVER_CONFIG.get_port()
    );

    // start HTTP server
    HttpServer::new(move || {
        build_app(pool.clone(), tmpl_reloader.clone(), cookie_secret_key.clone())
    })
    .bind((
        SERVER_CONFIG.get_bind_address().clone(),
        *SERVER_CONFIG.get_port(),
    ))?
    .workers(*SERVER_CONFIG.get_workers())
    .run()
    .await
}
