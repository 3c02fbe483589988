use std::{io, time::Duration};

use {
    axum::{
        http::{
            header::{InvalidHeaderValue, WWW_AUTHENTICATE},
            StatusCode,
        },
        response::{IntoResponse, Response},
    },
    thiserror::Error,
    tracing::{error, subscriber::SetGlobalDefaultError},
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request is not authenticated")]
    Unauthenticated,

    #[error("Session store failure: {0}")]
    SessionStoreFailure(String),

    #[error("Session store did not respond within {0:?}")]
    SessionStoreTimeout(Duration),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] figment::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid HTTP header value: {0}")]
    InvalidHttpHeaderValue(#[from] InvalidHeaderValue),

    #[error("Failed to install the global logger: {0}")]
    LoggerError(#[from] SetGlobalDefaultError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, "Bearer")],
                format!("{}: Authentication required", StatusCode::UNAUTHORIZED),
            )
                .into_response(),
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                format!("{}: No route for {path}", StatusCode::NOT_FOUND),
            )
                .into_response(),
            _ => {
                error!(err = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!(
                        "{}: An unexpected error occurred",
                        StatusCode::INTERNAL_SERVER_ERROR
                    ),
                )
                    .into_response()
            }
        }
    }
}
