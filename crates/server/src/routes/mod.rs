// Copyright 2025 Alexandre D. Díaz
pub mod admin;
pub mod api;
pub mod sitemap;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sitemap::route)
        .configure(admin::configure)
        .configure(api::configure);
}
