use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error returned by every Car Doctor handler and by the auth gate.
///
/// Rendered as `{"kind": ..., "message": ...}` with the matching status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized access")]
    Unauthorized,
    #[error("forbidden access")]
    Forbidden,
    #[error("invalid document id")]
    InvalidId,
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidClaims(_) => "INVALID_CLAIMS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidId | Self::InvalidClaims(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors and already visible through TraceLayer.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
