// Copyright 2025 Alexandre D. Díaz
use std::path::PathBuf;

use actix_utils::future::{ready, Ready};
use actix_web::{dev, error, web, FromRequest, HttpRequest};
use actix_web_lab::respond::Html;
use minijinja::path_loader;
use minijinja_autoreload::AutoReloader;

/// Request-scoped access to the template environment.
pub struct MiniJinjaRenderer {
    tmpl_env: web::Data<AutoReloader>,
}

impl MiniJinjaRenderer {
    pub fn from_req(req: &HttpRequest) -> MiniJinjaRenderer {
        MiniJinjaRenderer {
            tmpl_env: req
                .app_data::<web::Data<AutoReloader>>()
                .cloned()
                .unwrap_or_else(|| web::Data::new(new_reloader(PathBuf::from("./web/templates"), false))),
        }
    }

    pub fn render(
        &self,
        tmpl: &str,
        ctx: impl Into<minijinja::value::Value>,
    ) -> actix_web::Result<Html> {
        self.tmpl_env
            .acquire_env()
            .map_err(|_| error::ErrorInternalServerError("could not acquire template env"))?
            .get_template(tmpl)
            .map_err(|_| error::ErrorInternalServerError("could not find template"))?
            .render(ctx.into())
            .map(Html)
            .map_err(|err| {
                log::error!("{err}");
                error::ErrorInternalServerError("template error")
            })
    }
}

impl FromRequest for MiniJinjaRenderer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _pl: &mut dev::Payload) -> Self::Future {
        ready(Ok(MiniJinjaRenderer::from_req(req)))
    }
}

/// The closure is invoked every time the environment is outdated to recreate it.
pub fn new_reloader(tmpl_path: PathBuf, autoreload: bool) -> AutoReloader {
    AutoReloader::new(move |notifier| {
        let mut env: minijinja::Environment<'static> = minijinja::Environment::new();

        // if watch_path is never called, no fs watcher is created
        if autoreload {
            notifier.watch_path(&tmpl_path, true);
        }

        env.set_loader(path_loader(&tmpl_path));

        Ok(env)
    })
}
