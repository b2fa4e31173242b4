use std::path::PathBuf;

use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

pub(crate) type AppResult<T> = Result<T, AppError>;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("failed to read env file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("invalid database port `{0}`")]
    InvalidPort(String),
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database connection has not been established")]
    NotConnected,
}

#[derive(Error, Debug)]
pub(crate) enum AppError {
    #[error("{0}")]
    DbError(#[from] DbError),
    #[error("{0}")]
    SqlxError(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{}", self);

        match self {
            AppError::DbError(err @ (DbError::Connect(_) | DbError::NotConnected)) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string()).into_response()
            }
            AppError::DbError(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
            AppError::SqlxError(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}
