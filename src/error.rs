use std::{
    env::VarError, io::Error as IoError, num::ParseIntError,
    num::TryFromIntError, str::ParseBoolError,
};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IoError),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] sqlx::Error),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    ParseBoolError(#[from] ParseBoolError),

    #[error("{0}")]
    TryFromIntError(#[from] TryFromIntError),

    #[error("{0}")]
    Transport(#[from] alloy::transports::TransportError),

    #[error("{0}")]
    AbiDecode(#[from] alloy::sol_types::Error),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] SetGlobalDefaultError),

    #[error("{0}")]
    AnyHowError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Parse message error: {0}")]
    ParseMessage(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Block not found: {0}")]
    MissingBlock(i64),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request - client sent invalid input
            Error::InvalidAddress(_) => StatusCode::BAD_REQUEST,

            // 502 Bad Gateway - the node could not be reached or is behind
            Error::Transport(_) | Error::MissingBlock(_) => {
                StatusCode::BAD_GATEWAY
            },

            // 500 Internal Server Error - everything else
            Error::Io(_)
            | Error::INT(_)
            | Error::SQL(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::JsonError(_)
            | Error::ParseBoolError(_)
            | Error::TryFromIntError(_)
            | Error::AbiDecode(_)
            | Error::SetGlobalDefaultError(_)
            | Error::AnyHowError(_)
            | Error::ConfigurationError(_)
            | Error::ParseMessage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        HttpResponse::build(status).json(body)
    }
}
