use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::clients::UpstreamError;
use crate::pipeline::PipelineError;

pub type ApiResult<T> = Result<T, ApiError>;

/// API error taxonomy.
///
/// Each variant maps to exactly one status code, and the response body is
/// always the flat `{"error": <message>}` shape. Upstream messages pass
/// through verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing question")]
    MissingQuestion,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// A route needs a corpus that was never configured or failed to load.
    #[error("{0}")]
    Corpus(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingQuestion => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Corpus(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::EmptyQuestion => ApiError::MissingQuestion,
            PipelineError::Upstream(upstream) => ApiError::Upstream(upstream),
        }
    }
}
