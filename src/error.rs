//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Registry construction errors. These abort startup; they never reach a request.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("primary key '{field}' of table '{table}' is not a declared field")]
    PrimaryKeyNotDeclared { table: String, field: String },
    #[error("table '{table}' field '{field}' references unregistered table '{target}'")]
    DanglingReference {
        table: String,
        field: String,
        target: String,
    },
    #[error("table '{table}' field '{field}': display field '{display}' does not exist on '{target}'")]
    MissingDisplayField {
        table: String,
        field: String,
        target: String,
        display: String,
    },
    #[error("duplicate table identifier: {0}")]
    DuplicateTable(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("table not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database unreachable: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("statement failed: {0}")]
    Execution(#[source] sqlx::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Connection(e)
            }
            other => AppError::Execution(other),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Connection(_) => (StatusCode::INTERNAL_SERVER_ERROR, "connection_error"),
            AppError::Execution(_) => (StatusCode::INTERNAL_SERVER_ERROR, "execution_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
