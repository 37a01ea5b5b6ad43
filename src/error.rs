//! Error types for the request boundary and cue delivery

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Rejected inbound request
#[derive(Debug, Error, PartialEq)]
pub enum IngressError {
    /// Required query parameter was not supplied
    #[error("missing parameter '{0}'")]
    Missing(&'static str),

    /// Query parameter was supplied but is not a finite number
    #[error("malformed parameter '{name}': {value:?} is not a finite number")]
    Malformed { name: &'static str, value: String },
}

impl IntoResponse for IngressError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Failure to deliver a cue or a prop signal
#[derive(Debug, Error)]
pub enum EgressError {
    /// UDP socket error
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// OSC packet could not be encoded
    #[error("OSC encoding error: {0}")]
    Encoding(String),

    /// Prop controller request failed
    #[error("prop controller unreachable: {0}")]
    Http(#[from] reqwest::Error),

    /// Prop controller answered with a non-success status
    #[error("prop controller returned status {0}")]
    Status(reqwest::StatusCode),
}
