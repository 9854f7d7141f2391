// Copyright 2025 Alexandre D. Díaz
use actix_cors::Cors;
use actix_files as afs;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    body::MessageBody,
    cookie::Key,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::{header, StatusCode},
    middleware::{ErrorHandlers, Logger, NormalizePath},
    web, App, Error,
};
use minijinja_autoreload::AutoReloader;

use pokedb::Pool;

use crate::config::SERVER_CONFIG;
use crate::middlewares::not_found;
use crate::routes;

/// The full application: routes, static files, sessions, CORS, the 404
/// page, trailing slash normalization and access logs.
pub fn build_app(
    pool: Pool,
    tmpl_reloader: web::Data<AutoReloader>,
    cookie_key: Key,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
> {
    let cors = Cors::default()
        .allowed_origin_fn(|origin, _req_head| {
            SERVER_CONFIG.is_allowed_origin(origin.to_str().unwrap_or(""))
        })
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    App::new()
        // store db pool as Data object
        .app_data(web::Data::new(pool))
        .app_data(tmpl_reloader)
        .service(afs::Files::new("/static", SERVER_CONFIG.get_static_path()))
        .configure(routes::configure)
        .wrap(SessionMiddleware::new(CookieSessionStore::default(), cookie_key))
        .wrap(cors)
        .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found::handler_fn))
        .wrap(NormalizePath::trim())
        .wrap(Logger::default())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use actix_web::{test, web};
    use serde_json::{json, Value};

    use super::*;
    use crate::minijinja_renderer::new_reloader;
    use crate::routes::api::tests::memory_pool;

    fn templates() -> web::Data<AutoReloader> {
        web::Data::new(new_reloader(
            PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/web/templates")),
            false,
        ))
    }

    fn content_type<B>(res: &ServiceResponse<B>) -> String {
        res.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|x| x.to_str().ok())
            .unwrap_or("")
            .to_string()
    }

    #[actix_web::test]
    async fn api_not_found_stays_json() {
        let app = test::init_service(build_app(memory_pool(), templates(), Key::generate())).await;

        let req = test::TestRequest::get().uri("/users/99/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(content_type(&res).starts_with("application/json"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "User not found"}));

        let req = test::TestRequest::delete()
            .uri("/favourites/")
            .set_json(json!({"user_id": 1, "pokemon_id": 1}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Favourite not found"}));
    }

    #[actix_web::test]
    async fn trailing_slashes_are_ignored() {
        let app = test::init_service(build_app(memory_pool(), templates(), Key::generate())).await;
        let req = test::TestRequest::get().uri("/users/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn sitemap_and_unknown_pages_are_html() {
        let app = test::init_service(build_app(memory_pool(), templates(), Key::generate())).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(content_type(&res).starts_with("text/html"));
        let html = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(html.contains("/favourites"));

        let req = test::TestRequest::get().uri("/nope").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(content_type(&res).starts_with("text/html"));
        let html = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(html.contains("Page not found"));
    }
}
