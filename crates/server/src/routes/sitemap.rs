// Copyright 2025 Alexandre D. Díaz
use actix_web::{get, HttpRequest, Responder, Result};
use minijinja::context;
use serde::Serialize;

use crate::minijinja_renderer::MiniJinjaRenderer;
use crate::utils::get_minijinja_context;

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
}

pub static ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo { method: "GET", path: "/users" },
    EndpointInfo { method: "GET", path: "/users/{id}" },
    EndpointInfo { method: "POST", path: "/users" },
    EndpointInfo { method: "GET", path: "/pokemons" },
    EndpointInfo { method: "GET", path: "/pokemons/{id}" },
    EndpointInfo { method: "POST", path: "/pokemons" },
    EndpointInfo { method: "GET", path: "/habilidades" },
    EndpointInfo { method: "GET", path: "/habilidades/{id}" },
    EndpointInfo { method: "GET", path: "/trainers" },
    EndpointInfo { method: "GET", path: "/trainers/{id}" },
    EndpointInfo { method: "GET", path: "/favourites" },
    EndpointInfo { method: "POST", path: "/favourites" },
    EndpointInfo { method: "DELETE", path: "/favourites" },
];

#[get("/")]
pub async fn route(tmpl_env: MiniJinjaRenderer, req: HttpRequest) -> Result<impl Responder> {
    tmpl_env.render(
        "pages/sitemap.html",
        context!(
            ..get_minijinja_context(&req),
            ..context!(
                page_name => "sitemap",
                endpoints => ENDPOINTS,
            )
        ),
    )
}
