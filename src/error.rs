use std::{
    env::VarError,
    fmt,
    io::Error as IO_ERROR,
    num::{ParseFloatError, ParseIntError},
    str::ParseBoolError as PARSE_BOOL_ERROR,
    time::Duration,
};

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

/// Upstream data providers the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Price,
    Network,
    Explorer,
    Tokens,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Price => "price",
            Provider::Network => "network-stats",
            Provider::Explorer => "explorer",
            Provider::Tokens => "token-list",
        };
        f.write_str(name)
    }
}

/// Why an outbound call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    HttpStatus(u16),
    Transport,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {}", code),
            FailureKind::Transport => f.write_str("transport"),
            FailureKind::Decode => f.write_str("decode"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{provider} provider failed ({kind}): {detail}")]
pub struct UpstreamError {
    pub provider: Provider,
    pub kind: FailureKind,
    pub detail: String,
}

impl UpstreamError {
    pub fn new(
        provider: Provider,
        kind: FailureKind,
        detail: impl Into<String>,
    ) -> Self {
        UpstreamError {
            provider,
            kind,
            detail: detail.into(),
        }
    }

    /// Payload did not match the provider schema.
    pub fn decode(provider: Provider, detail: impl Into<String>) -> Self {
        Self::new(provider, FailureKind::Decode, detail)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FailureKind::HttpStatus(404)
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    FLOAT(#[from] ParseFloatError),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    ParseBoolError(#[from] PARSE_BOOL_ERROR),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Server end with error: {0}")]
    ServerError(String),

    #[error("Task error: {0}")]
    TaskError(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),

    #[error("Cannot compute {metric}: required input {input} unavailable ({reason})")]
    MissingRequiredInput {
        metric: &'static str,
        input: &'static str,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded on {route}")]
    RateLimited { route: String, retry_after: Duration },

    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl Error {
    pub fn missing_input(
        metric: &'static str,
        input: &'static str,
        reason: impl fmt::Display,
    ) -> Self {
        Error::MissingRequiredInput {
            metric,
            input,
            reason: reason.to_string(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InputValidation(_) => StatusCode::BAD_REQUEST,

            Error::NotFound(_) => StatusCode::NOT_FOUND,

            Error::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,

            Error::UpstreamUnavailable(_)
            | Error::MissingRequiredInput { .. }
            | Error::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,

            Error::Io(_)
            | Error::URL(_)
            | Error::INT(_)
            | Error::FLOAT(_)
            | Error::VAR(_)
            | Error::ParseBoolError(_)
            | Error::TokioJoinError(_)
            | Error::JsonError(_)
            | Error::ReqwestError(_)
            | Error::SetGlobalDefaultError(_)
            | Error::ConfigurationError(_)
            | Error::ServerError(_)
            | Error::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            String::from("Internal server error")
        } else {
            self.to_string()
        };
        let body = serde_json::json!({
            "success": false,
            "error": message,
            "status": status.as_u16(),
        });

        let mut response = HttpResponse::build(status);
        if let Error::RateLimited { retry_after, .. } = self {
            response.insert_header((
                header::RETRY_AFTER,
                retry_after.as_secs().max(1).to_string(),
            ));
        }
        response.json(body)
    }
}
