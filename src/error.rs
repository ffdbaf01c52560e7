use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Every failure a request can end in. Each maps to one HTTP status and a
/// `{ "error": ... }` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("AI credits exhausted. Please add credits.")]
    QuotaExhausted,

    /// Non-2xx from the provider other than 429/402, or a transport failure.
    #[error("AI gateway error: {}", describe_status(.status))]
    Upstream { status: Option<u16> },

    #[error("malformed AI gateway response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("{0} is not configured")]
    Configuration(&'static str),

    #[error("storage failure")]
    Persistence(#[source] anyhow::Error),

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "unreachable".into(),
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            AppError::Upstream { .. }
            | AppError::MalformedUpstreamResponse(_)
            | AppError::Configuration(_)
            | AppError::Persistence(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Persistence(e)
    }
}

// Extractor rejections are client input errors and share the JSON error body.
impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                AppError::Persistence(source) | AppError::Internal(source) => {
                    error!(error = ?source, "request failed")
                }
                other => error!(error = %other, "request failed"),
            }
        } else {
            warn!(%status, error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_conditions_keep_their_statuses() {
        assert_eq!(AppError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::QuotaExhausted.status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(
            AppError::Upstream { status: Some(503) }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::MalformedUpstreamResponse("no tool call".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn persistence_message_hides_source() {
        let err = AppError::from(anyhow::anyhow!("relation \"food_entries\" does not exist"));
        assert_eq!(err.to_string(), "storage failure");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn upstream_message_carries_status() {
        let err = AppError::Upstream { status: Some(503) };
        assert_eq!(err.to_string(), "AI gateway error: 503");
        let err = AppError::Upstream { status: None };
        assert_eq!(err.to_string(), "AI gateway error: unreachable");
    }
}
