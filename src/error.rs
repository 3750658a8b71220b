//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Db(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Db(sqlx::Error::RowNotFound) => "not_found",
            AppError::Db(_) => "database_error",
            AppError::Io(_) => "io_error",
        }
    }

    /// Backend failures hide their text behind a generic message; the text travels as `details`.
    pub fn is_backend(&self) -> bool {
        self.status().is_server_error()
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Attached to every error response so the details layer can decide what the client sees.
#[derive(Clone, Debug)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorReport {
    pub fn body(&self, with_details: bool) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
            code: self.code.to_string(),
            details: if with_details { self.details.clone() } else { None },
        }
    }
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno no servidor";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let report = if self.is_backend() {
            tracing::error!(code, error = %self, "request failed");
            ErrorReport {
                status,
                code,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                details: Some(self.to_string()),
            }
        } else {
            let message = match &self {
                AppError::Db(sqlx::Error::RowNotFound) => crate::response::NOT_FOUND_MESSAGE.to_string(),
                other => other.to_string(),
            };
            ErrorReport {
                status,
                code,
                message,
                details: None,
            }
        };
        let mut response = (status, Json(report.body(false))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
