use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::explain::ExplainError;
use crate::core::stt::STTError;

/// Application error type
///
/// Rendered as `{"detail": <message>, "status": <code>}`; the browser client reads
/// `detail`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A required upstream credential is missing
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// An upstream provider failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotConfigured(_) | AppError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn detail(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::NotConfigured(msg)
            | AppError::Upstream(msg)
            | AppError::ServiceUnavailable(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Upstream(msg) => tracing::error!("Upstream error: {}", msg),
            AppError::NotConfigured(msg) => tracing::error!("Not configured: {}", msg),
            AppError::BadRequest(msg) => tracing::warn!("Bad request: {}", msg),
            AppError::ServiceUnavailable(msg) => tracing::warn!("Service unavailable: {}", msg),
        }

        let body = Json(json!({
            "detail": self.detail(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ExplainError> for AppError {
    fn from(err: ExplainError) -> Self {
        match err {
            ExplainError::InvalidRequest(msg) => AppError::BadRequest(msg),
            upstream @ ExplainError::UpstreamTextGeneration(_) => {
                AppError::Upstream(upstream.to_string())
            }
        }
    }
}

impl From<STTError> for AppError {
    fn from(err: STTError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::LlmError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotConfigured("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ServiceUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_explain_error_mapping() {
        let bad: AppError = ExplainError::InvalidRequest("Topic is required.".into()).into();
        assert_eq!(bad.detail(), "Topic is required.");

        let upstream: AppError = ExplainError::UpstreamTextGeneration(LlmError::Request(
            "connection reset".into(),
        ))
        .into();
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(upstream.detail().starts_with("AI Error:"));
    }
}
