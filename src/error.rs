use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::warn;

use crate::models::response::ErrorResponse;

/// Per-request failures surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unsupported action type: {0}")]
    UnsupportedAction(String),

    #[error("failed to read template '{location}': {source}")]
    TemplateRead {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch template '{location}': {reason}")]
    TemplateFetch { location: String, reason: String },

    #[error("template syntax error: {0}")]
    Parse(String),

    #[error("template execution error: {0}")]
    Execute(String),

    #[error("missing or invalid API key")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidBody(_) => "invalid_body",
            ServiceError::MissingField(_) => "missing_field",
            ServiceError::UnsupportedAction(_) => "unsupported_action",
            ServiceError::TemplateRead { .. } => "template_read",
            ServiceError::TemplateFetch { .. } => "template_fetch",
            ServiceError::Parse(_) => "parse_failure",
            ServiceError::Execute(_) => "execution_failure",
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::TemplateFetch { .. } => StatusCode::BAD_GATEWAY,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::InvalidBody(error.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        warn!(kind = self.kind(), status = %status, error = %self, "Request failed");

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
