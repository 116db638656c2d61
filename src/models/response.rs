use serde::{Deserialize, Serialize};

use crate::{error::ServiceError, models::template::RenderResult};

/// Body returned by the flat REST render endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub output: String,
    pub encoding_format: String,
    pub content_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl From<RenderResult> for RenderResponse {
    fn from(result: RenderResult) -> Self {
        Self {
            output: result.output,
            encoding_format: result.encoding_format,
            content_size: result.content_size,
        }
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(error: &ServiceError) -> Self {
        Self {
            error: error.to_string(),
            kind: error.kind().to_string(),
        }
    }
}
