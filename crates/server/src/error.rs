// Copyright 2025 Alexandre D. Díaz
use actix_web::{
    error::{BlockingError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Db(#[from] pokedb::Error),
    #[error("blocking pool: {0}")]
    Blocking(#[from] BlockingError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Message shown to clients. Internal failures are not described.
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Db(err) => match err {
                pokedb::Error::MissingData
                | pokedb::Error::Validation(_)
                | pokedb::Error::InvalidReference(_) => StatusCode::BAD_REQUEST,
                pokedb::Error::NotFound(_) => StatusCode::NOT_FOUND,
                pokedb::Error::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.public_message(),
        })
    }
}

/// Bodies that are not valid JSON are treated as missing data.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected json payload: {}", err);
    ApiError::from(pokedb::Error::MissingData).into()
}
