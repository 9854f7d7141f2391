// Copyright 2025 Alexandre D. Díaz
use actix_web::{get, post, web, Error as AWError, HttpResponse};

use pokedb::{
    models::pokemon::{self, NewPokemon},
    serialize, Error, Pool,
};

use crate::db;

#[get("/pokemons")]
pub async fn route_list(pool: web::Data<Pool>) -> Result<HttpResponse, AWError> {
    let result = db::run(pool, serialize::pokemon_infos).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/pokemons/{pokemon_id}")]
pub async fn route(pool: web::Data<Pool>, path: web::Path<i64>) -> Result<HttpResponse, AWError> {
    let pokemon_id = path.into_inner();
    let result = db::run(pool, move |conn| {
        let pokemon =
            pokemon::get_by_id(conn, &pokemon_id)?.ok_or(Error::NotFound("Pokemon"))?;
        serialize::pokemon_info(conn, &pokemon)
    })
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/pokemons")]
pub async fn route_create(
    pool: web::Data<Pool>,
    info: web::Json<NewPokemon>,
) -> Result<HttpResponse, AWError> {
    let new_pokemon = info.into_inner();
    let result = db::run(pool, move |conn| {
        let pokemon = pokemon::create(conn, &new_pokemon)?;
        serialize::pokemon_info(conn, &pokemon)
    })
    .await?;
    Ok(HttpResponse::Created().json(result))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};

    use crate::routes::api::{self, tests::memory_pool};

    #[actix_web::test]
    async fn create_then_get() {
        let pool = memory_pool();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(api::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/pokemons")
            .set_json(json!({"name": "Pikachu"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(res).await;
        let id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/pokemons/{}", id))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            fetched,
            json!({
                "id": id,
                "name": "Pikachu",
                "pokemon_type": null,
                "is_legendary": false,
                "favourited_by": [],
            })
        );
    }

    #[actix_web::test]
    async fn legendary_flag_is_kept() {
        let pool = memory_pool();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(api::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/pokemons")
            .set_json(json!({"name": "Mewtwo", "pokemon_type": "psychic", "is_legendary": true}))
            .to_request();
        test::call_service(&app, req).await;
        let req = test::TestRequest::get().uri("/pokemons").to_request();
        let pokemons: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pokemons[0]["pokemon_type"], "psychic");
        assert_eq!(pokemons[0]["is_legendary"], true);
    }

    #[actix_web::test]
    async fn name_is_required() {
        let pool = memory_pool();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(api::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/pokemons")
            .set_json(json!({"pokemon_type": "fire"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Missing data"}));
    }

    #[actix_web::test]
    async fn unknown_pokemon() {
        let pool = memory_pool();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(api::configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/pokemons/5").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Pokemon not found"}));
    }
}
