// Copyright 2025 Alexandre D. Díaz
use actix_session::Session;
use actix_web::{
    get,
    http::{header, StatusCode},
    post, web, HttpRequest, HttpResponse, Responder, ResponseError, Result,
};
use minijinja::{context, Value};
use serde::{Deserialize, Serialize};

use pokedb::{
    models::{
        self,
        favourite::{self, NewFavourite},
        habilidad::{self, NewHabilidad},
        pokemon::{self, NewPokemon},
        trainer::{self, NewTrainer},
        user::{self, NewUser},
    },
    serialize::{self, UserInfo},
    Error, Pool,
};

use crate::db;
use crate::error::ApiError;
use crate::minijinja_renderer::MiniJinjaRenderer;
use crate::utils::get_minijinja_context;

static FLASH_KEY: &str = "admin_flash";

#[derive(Debug, Serialize)]
pub struct EntityCount {
    pub name: &'static str,
    pub path: &'static str,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct FavouritesPage {
    pub favourites: Vec<favourite::Model>,
    pub users: Vec<UserInfo>,
    pub pokemons: Vec<pokemon::Model>,
    pub habilidades: Vec<habilidad::Model>,
    pub trainers: Vec<trainer::Model>,
}

#[derive(Debug, Deserialize)]
pub struct PokemonForm {
    name: Option<String>,
    pokemon_type: Option<String>,
    is_legendary: Option<String>,
}

impl PokemonForm {
    fn to_new(&self) -> NewPokemon {
        NewPokemon {
            name: self.name.clone(),
            pokemon_type: self.pokemon_type.clone(),
            is_legendary: Some(self.is_legendary.is_some()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HabilidadForm {
    name: Option<String>,
    power: Option<String>,
    accuracy: Option<String>,
}

impl HabilidadForm {
    fn to_new(&self) -> pokedb::Result<NewHabilidad> {
        Ok(NewHabilidad {
            name: self.name.clone(),
            power: parse_number("power", &self.power)?,
            accuracy: parse_number("accuracy", &self.accuracy)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TrainerForm {
    name: Option<String>,
    age: Option<String>,
    hometown: Option<String>,
}

impl TrainerForm {
    fn to_new(&self) -> pokedb::Result<NewTrainer> {
        Ok(NewTrainer {
            name: self.name.clone(),
            age: parse_number("age", &self.age)?,
            hometown: self.hometown.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FavouriteForm {
    user_id: Option<String>,
    pokemon_id: Option<String>,
    habilidad_id: Option<String>,
    trainer_id: Option<String>,
}

impl FavouriteForm {
    fn to_new(&self) -> pokedb::Result<NewFavourite> {
        Ok(NewFavourite {
            user_id: parse_number("user_id", &self.user_id)?,
            pokemon_id: parse_number("pokemon_id", &self.pokemon_id)?,
            habilidad_id: parse_number("habilidad_id", &self.habilidad_id)?,
            trainer_id: parse_number("trainer_id", &self.trainer_id)?,
        })
    }
}

/// HTML forms send every field as text; blanks are absent values.
fn parse_number(field: &str, value: &Option<String>) -> pokedb::Result<Option<i64>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::Validation(format!("{} must be an integer", field))),
    }
}

fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or_else(|err| {
        log::warn!("can't read the flash message: {}", err);
        None
    });
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}

fn set_flash(session: &Session, message: String) {
    if let Err(err) = session.insert(FLASH_KEY, message) {
        log::warn!("can't store the flash message: {}", err);
    }
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

fn render_page(
    tmpl_env: &MiniJinjaRenderer,
    req: &HttpRequest,
    session: &Session,
    template: &str,
    page_name: &str,
    page: Value,
    error: Option<&ApiError>,
) -> Result<HttpResponse> {
    let status = error.map(|x| x.status_code()).unwrap_or(StatusCode::OK);
    let body = tmpl_env.render(
        template,
        context!(
            ..get_minijinja_context(req),
            ..context!(
                page_name => page_name,
                flash => take_flash(session),
                error => error.map(|x| x.public_message()),
            ),
            ..page
        ),
    )?;
    Ok(body
        .customize()
        .with_status(status)
        .respond_to(req)
        .map_into_boxed_body())
}

/// Failures loading a page are shown as the HTML error page.
fn render_error(
    tmpl_env: &MiniJinjaRenderer,
    req: &HttpRequest,
    error: &ApiError,
) -> Result<HttpResponse> {
    let status = error.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        log::error!("{}", error);
    }
    let body = tmpl_env.render(
        "pages/error.html",
        context!(
            ..get_minijinja_context(req),
            ..context!(
                error => error.public_message(),
                status_code => status.as_str(),
            )
        ),
    )?;
    Ok(body
        .customize()
        .with_status(status)
        .respond_to(req)
        .map_into_boxed_body())
}

async fn render_users(
    pool: web::Data<Pool>,
    tmpl_env: &MiniJinjaRenderer,
    req: &HttpRequest,
    session: &Session,
    error: Option<ApiError>,
) -> Result<HttpResponse> {
    let users = match db::run(pool, serialize::user_infos).await {
        Ok(users) => users,
        Err(err) => return render_error(tmpl_env, req, &err),
    };
    render_page(
        tmpl_env,
        req,
        session,
        "pages/admin/users.html",
        "users",
        context!(users => users),
        error.as_ref(),
    )
}

async fn render_pokemons(
    pool: web::Data<Pool>,
    tmpl_env: &MiniJinjaRenderer,
    req: &HttpRequest,
    session: &Session,
    error: Option<ApiError>,
) -> Result<HttpResponse> {
    let pokemons = match db::run(pool, serialize::pokemon_infos).await {
        Ok(pokemons) => pokemons,
        Err(err) => return render_error(tmpl_env, req, &err),
    };
    render_page(
        tmpl_env,
        req,
        session,
        "pages/admin/pokemons.html",
        "pokemons",
        context!(pokemons => pokemons),
        error.as_ref(),
    )
}

async fn render_habilidades(
    pool: web::Data<Pool>,
    tmpl_env: &MiniJinjaRenderer,
    req: &HttpRequest,
    session: &Session,
    error: Option<ApiError>,
) -> Result<HttpResponse> {
    let habilidades = match db::run(pool, serialize::habilidad_infos).await {
        Ok(habilidades) => habilidades,
        Err(err) => return render_error(tmpl_env, req, &err),
    };
    render_page(
        tmpl_env,
        req,
        session,
        "pages/admin/habilidades.html",
        "habilidades",
        context!(habilidades => habilidades),
        error.as_ref(),
    )
}

async fn render_trainers(
    pool: web::Data<Pool>,
    tmpl_env: &MiniJinjaRenderer,
    req: &HttpRequest,
    session: &Session,
    error: Option<ApiError>,
) -> Result<HttpResponse> {
    let trainers = match db::run(pool, serialize::trainer_infos).await {
        Ok(trainers) => trainers,
        Err(err) => return render_error(tmpl_env, req, &err),
    };
    render_page(
        tmpl_env,
        req,
        session,
        "pages/admin/trainers.html",
        "trainers",
        context!(trainers => trainers),
        error.as_ref(),
    )
}

async fn render_favourites(
    pool: web::Data<Pool>,
    tmpl_env: &MiniJinjaRenderer,
    req: &HttpRequest,
    session: &Session,
    error: Option<ApiError>,
) -> Result<HttpResponse> {
    let page = db::run(pool, |conn| {
        Ok(FavouritesPage {
            favourites: favourite::get_all(conn)?,
            users: serialize::user_infos(conn)?,
            pokemons: pokemon::get_all(conn)?,
            habilidades: habilidad::get_all(conn)?,
            trainers: trainer::get_all(conn)?,
        })
    })
    .await;
    let page = match page {
        Ok(page) => page,
        Err(err) => return render_error(tmpl_env, req, &err),
    };
    render_page(
        tmpl_env,
        req,
        session,
        "pages/admin/favourites.html",
        "favourites",
        Value::from_serializable(&page),
        error.as_ref(),
    )
}

#[get("/admin")]
pub async fn route(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
) -> Result<HttpResponse> {
    let counts = db::run(pool, |conn| {
        Ok(vec![
            EntityCount {
                name: "Users",
                path: "users",
                count: models::count(conn, user::TABLE_NAME)?,
            },
            EntityCount {
                name: "Pokemons",
                path: "pokemons",
                count: models::count(conn, pokemon::TABLE_NAME)?,
            },
            EntityCount {
                name: "Habilidades",
                path: "habilidades",
                count: models::count(conn, habilidad::TABLE_NAME)?,
            },
            EntityCount {
                name: "Trainers",
                path: "trainers",
                count: models::count(conn, trainer::TABLE_NAME)?,
            },
            EntityCount {
                name: "Favourites",
                path: "favourites",
                count: models::count(conn, favourite::TABLE_NAME)?,
            },
        ])
    })
    .await;
    let counts = match counts {
        Ok(counts) => counts,
        Err(err) => return render_error(&tmpl_env, &req, &err),
    };
    render_page(
        &tmpl_env,
        &req,
        &session,
        "pages/admin/index.html",
        "admin",
        context!(counts => counts),
        None,
    )
}

#[get("/admin/users")]
pub async fn route_users(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
) -> Result<HttpResponse> {
    render_users(pool, &tmpl_env, &req, &session, None).await
}

#[post("/admin/users")]
pub async fn route_users_create(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
    form: web::Form<NewUser>,
) -> Result<HttpResponse> {
    let new_user = form.into_inner();
    match db::run(pool.clone(), move |conn| user::create(conn, &new_user)).await {
        Ok(user) => {
            set_flash(&session, format!("User '{}' created", &user.username));
            Ok(redirect("/admin/users"))
        }
        Err(err) => render_users(pool, &tmpl_env, &req, &session, Some(err)).await,
    }
}

#[get("/admin/pokemons")]
pub async fn route_pokemons(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
) -> Result<HttpResponse> {
    render_pokemons(pool, &tmpl_env, &req, &session, None).await
}

#[post("/admin/pokemons")]
pub async fn route_pokemons_create(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
    form: web::Form<PokemonForm>,
) -> Result<HttpResponse> {
    let new_pokemon = form.to_new();
    match db::run(pool.clone(), move |conn| pokemon::create(conn, &new_pokemon)).await {
        Ok(pokemon) => {
            set_flash(&session, format!("Pokemon '{}' created", &pokemon.name));
            Ok(redirect("/admin/pokemons"))
        }
        Err(err) => render_pokemons(pool, &tmpl_env, &req, &session, Some(err)).await,
    }
}

#[get("/admin/habilidades")]
pub async fn route_habilidades(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
) -> Result<HttpResponse> {
    render_habilidades(pool, &tmpl_env, &req, &session, None).await
}

#[post("/admin/habilidades")]
pub async fn route_habilidades_create(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
    form: web::Form<HabilidadForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    match db::run(pool.clone(), move |conn| habilidad::create(conn, &form.to_new()?)).await {
        Ok(habilidad) => {
            set_flash(&session, format!("Habilidad '{}' created", &habilidad.name));
            Ok(redirect("/admin/habilidades"))
        }
        Err(err) => render_habilidades(pool, &tmpl_env, &req, &session, Some(err)).await,
    }
}

#[get("/admin/trainers")]
pub async fn route_trainers(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
) -> Result<HttpResponse> {
    render_trainers(pool, &tmpl_env, &req, &session, None).await
}

#[post("/admin/trainers")]
pub async fn route_trainers_create(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
    form: web::Form<TrainerForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    match db::run(pool.clone(), move |conn| trainer::create(conn, &form.to_new()?)).await {
        Ok(trainer) => {
            set_flash(&session, format!("Trainer '{}' created", &trainer.name));
            Ok(redirect("/admin/trainers"))
        }
        Err(err) => render_trainers(pool, &tmpl_env, &req, &session, Some(err)).await,
    }
}

#[get("/admin/favourites")]
pub async fn route_favourites(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
) -> Result<HttpResponse> {
    render_favourites(pool, &tmpl_env, &req, &session, None).await
}

#[post("/admin/favourites")]
pub async fn route_favourites_create(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
    form: web::Form<FavouriteForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    match db::run(pool.clone(), move |conn| favourite::create(conn, &form.to_new()?)).await {
        Ok(fav) => {
            set_flash(&session, format!("Favourite for '{}' created", &fav.user_id.1));
            Ok(redirect("/admin/favourites"))
        }
        Err(err) => render_favourites(pool, &tmpl_env, &req, &session, Some(err)).await,
    }
}

#[post("/admin/favourites/{favourite_id}/delete")]
pub async fn route_favourites_delete(
    pool: web::Data<Pool>,
    tmpl_env: MiniJinjaRenderer,
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let favourite_id = path.into_inner();
    match db::run(pool.clone(), move |conn| favourite::delete_by_id(conn, &favourite_id)).await {
        Ok(()) => {
            set_flash(&session, "Favourite removed".to_string());
            Ok(redirect("/admin/favourites"))
        }
        Err(err) => render_favourites(pool, &tmpl_env, &req, &session, Some(err)).await,
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(route)
        .service(route_users)
        .service(route_users_create)
        .service(route_pokemons)
        .service(route_pokemons_create)
        .service(route_habilidades)
        .service(route_habilidades_create)
        .service(route_trainers)
        .service(route_trainers_create)
        .service(route_favourites)
        .service(route_favourites_create)
        .service(route_favourites_delete);
}
