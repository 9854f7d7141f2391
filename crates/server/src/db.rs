// Copyright 2025 Alexandre D. Díaz
use actix_web::web;

use pokedb::{models::Connection, Pool};

use crate::error::ApiError;

/// Runs one repository call on the blocking thread pool with a connection
/// checked out for this request only.
pub async fn run<F, T>(pool: web::Data<Pool>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> pokedb::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = web::block(move || {
        let conn = pool.get()?;
        f(&conn)
    })
    .await?;
    result.map_err(ApiError::from)
}
