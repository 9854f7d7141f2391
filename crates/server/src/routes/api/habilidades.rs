// Copyright 2025 Alexandre D. Díaz
use actix_web::{get, web, Error as AWError, HttpResponse};

use pokedb::{models::habilidad, serialize, Error, Pool};

use crate::db;

#[get("/habilidades")]
pub async fn route_list(pool: web::Data<Pool>) -> Result<HttpResponse, AWError> {
    let result = db::run(pool, serialize::habilidad_infos).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/habilidades/{habilidad_id}")]
pub async fn route(pool: web::Data<Pool>, path: web::Path<i64>) -> Result<HttpResponse, AWError> {
    let habilidad_id = path.into_inner();
    let result = db::run(pool, move |conn| {
        let habilidad =
            habilidad::get_by_id(conn, &habilidad_id)?.ok_or(Error::NotFound("Habilidad"))?;
        serialize::habilidad_info(conn, &habilidad)
    })
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};

    use pokedb::models::habilidad::{self, NewHabilidad};

    use crate::routes::api::{self, tests::memory_pool};

    #[actix_web::test]
    async fn list_and_get() {
        let pool = memory_pool();
        let id = {
            let conn = pool.get().unwrap();
            habilidad::create(
                &conn,
                &NewHabilidad {
                    name: Some("Surf".to_string()),
                    power: Some(90),
                    accuracy: Some(100),
                },
            )
            .unwrap()
            .id
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(api::configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/habilidades").to_request();
        let habilidades: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            habilidades,
            json!([{"id": id, "name": "Surf", "power": 90, "accuracy": 100, "favourited_by": []}])
        );

        let req = test::TestRequest::get()
            .uri(&format!("/habilidades/{}", id + 1))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Habilidad not found"}));
    }
}
