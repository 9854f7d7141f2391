// Copyright Alexandre D. Díaz
use std::env;

use config::Config;
use lazy_static::lazy_static;
use url::Url;

#[derive(Debug)]
pub struct PokedexServerConfig {
    bind_address: String,
    port: u16,
    workers: usize,
    database_url: String,
    db_pool_max_size: u32,
    template_path: String,
    template_autoreload: bool,
    static_path: String,
    allowed_origins: Vec<Url>,
    cookie_key_bytes: Vec<u8>,
}

impl PokedexServerConfig {
    pub fn new() -> PokedexServerConfig {
        let settings = Config::builder()
            .add_source(config::File::with_name("./server").required(false))
            .add_source(config::Environment::with_prefix("POKEDEX"))
            .build()
            .unwrap_or_else(|err| {
                log::warn!("can't load the server configuration, using defaults: {}", err);
                Config::default()
            });
        PokedexServerConfig::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> PokedexServerConfig {
        let bind_address = settings
            .get_string("bind_address")
            .unwrap_or("0.0.0.0".to_string());
        let port = settings
            .get_int("port")
            .ok()
            .or_else(|| env::var("PORT").ok().and_then(|x| x.parse::<i64>().ok()))
            .and_then(|x| u16::try_from(x).ok())
            .unwrap_or(3000);
        let workers = settings
            .get_int("workers")
            .ok()
            .and_then(|x| usize::try_from(x).ok())
            .filter(|x| *x > 0)
            .unwrap_or(2);
        let database_url = settings
            .get_string("database_url")
            .ok()
            .or_else(|| env::var("DATABASE_URL").ok())
            .unwrap_or("sqlite:////tmp/test.db".to_string());
        let db_pool_max_size = settings
            .get_int("db_pool_max_size")
            .ok()
            .and_then(|x| u32::try_from(x).ok())
            .filter(|x| *x > 0)
            .unwrap_or(15);
        let template_path = settings
            .get_string("template_path")
            .unwrap_or("./web/templates".to_string());
        let template_autoreload = settings.get_bool("template_autoreload").unwrap_or(false);
        let static_path = settings
            .get_string("static_path")
            .unwrap_or("./static".to_string());
        let allowed_origins = settings
            .get_array("allowed_origins")
            .unwrap_or_else(|_| Vec::new())
            .iter()
            .filter_map(|x| Url::parse(&x.to_string()).ok())
            .collect::<Vec<Url>>();
        let cookie_key = settings.get_string("cookie_key").unwrap_or_default();
        let cookie_key_bytes = cookie_key.into_bytes();
        PokedexServerConfig {
            bind_address,
            port,
            workers,
            database_url,
            db_pool_max_size,
            template_path,
            template_autoreload,
            static_path,
            allowed_origins,
            cookie_key_bytes,
        }
    }

    pub fn get_bind_address(&self) -> &String {
        &self.bind_address
    }

    pub fn get_port(&self) -> &u16 {
        &self.port
    }

    pub fn get_workers(&self) -> &usize {
        &self.workers
    }

    pub fn get_database_url(&self) -> &String {
        &self.database_url
    }

    pub fn get_db_pool_max_size(&self) -> &u32 {
        &self.db_pool_max_size
    }

    pub fn get_template_path(&self) -> &String {
        &self.template_path
    }

    pub fn get_template_autoreload(&self) -> bool {
        self.template_autoreload
    }

    pub fn get_static_path(&self) -> &String {
        &self.static_path
    }

    pub fn get_allowed_origins(&self) -> &Vec<Url> {
        &self.allowed_origins
    }

    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        if self.get_allowed_origins().is_empty() {
            return true;
        }
        let url = match Url::parse(origin) {
            Ok(url) => url,
            Err(_) => return false,
        };
        self.get_allowed_origins().iter().any(|origin_url| {
            origin_url.scheme() == url.scheme()
                && origin_url.domain() == url.domain()
                && origin_url.port() == url.port()
        })
    }

    pub fn get_cookie_key_bytes(&self) -> &Vec<u8> {
        &self.cookie_key_bytes
    }
}

lazy_static! {
    pub static ref SERVER_CONFIG: PokedexServerConfig = PokedexServerConfig::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_numbers_use_defaults() {
        let settings = Config::builder()
            .set_override("port", 70000)
            .unwrap()
            .set_override("workers", -1)
            .unwrap()
            .set_override("db_pool_max_size", 0)
            .unwrap()
            .build()
            .unwrap();
        let config = PokedexServerConfig::from_settings(&settings);
        assert_eq!(*config.get_port(), 3000);
        assert_eq!(*config.get_workers(), 2);
        assert_eq!(*config.get_db_pool_max_size(), 15);
    }

    #[test]
    fn reads_configured_values() {
        let settings = Config::builder()
            .set_override("port", 8080)
            .unwrap()
            .set_override("workers", 4)
            .unwrap()
            .set_override("database_url", "sqlite::memory:")
            .unwrap()
            .set_override("allowed_origins", vec!["https://pokedex.example"])
            .unwrap()
            .build()
            .unwrap();
        let config = PokedexServerConfig::from_settings(&settings);
        assert_eq!(*config.get_port(), 8080);
        assert_eq!(*config.get_workers(), 4);
        assert_eq!(config.get_database_url(), "sqlite::memory:");
        assert!(config.is_allowed_origin("https://pokedex.example"));
        assert!(!config.is_allowed_origin("https://rocket.example"));
    }
}
