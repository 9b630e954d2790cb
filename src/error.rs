use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    #[error("PORT is not set; refusing to start the server")]
    MissingPort,

    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("BLOG_HOST must be an IP address, got {0:?}")]
    InvalidHost(String),

    #[error("Failed to prepare storage at {path}: {source}")]
    PrepareStorage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Schema creation failed: {0}")]
    Schema(SqlxError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found")]
    NotFound,
}

impl From<figment::Error> for BootstrapError {
    fn from(e: figment::Error) -> Self {
        BootstrapError::Config(Box::new(e))
    }
}

impl IntoResponse for BootstrapError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            BootstrapError::NotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "The requested resource was not found.".to_string(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
