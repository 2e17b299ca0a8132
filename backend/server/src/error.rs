use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reviews::{ValidationError, responses::ErrorBody};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("{0}")]
    MissingParameter(&'static str),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Review not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{summary}")]
    StoreFailure {
        summary: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Wraps a store error under a per-operation summary. A missing review stays a 404.
    pub fn store(summary: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| match source {
            StoreError::NotFound(_) => AppError::NotFound,
            source => AppError::StoreFailure { summary, source },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::MissingParameter { .. } => StatusCode::BAD_REQUEST,
            AppError::Invalid { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let details = match &self {
            AppError::StoreFailure { summary, source } => {
                error!("{summary}: {source}");
                Some(source.to_string())
            }
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use reviews::ValidationError;

    use super::AppError;
    use crate::store::StoreError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::MalformedPayload, StatusCode::BAD_REQUEST),
            (AppError::MissingParameter("Review ID is required"), StatusCode::BAD_REQUEST),
            (AppError::Invalid(ValidationError::InvalidReviewText), StatusCode::BAD_REQUEST),
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (AppError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_store_mapping() {
        let missing = AppError::store("Failed to report review")(StoreError::NotFound("7".into()));
        assert!(matches!(missing, AppError::NotFound));

        let corrupt = AppError::store("Failed to report review")(StoreError::Corrupt {
            id: "7".into(),
            reason: "bad rating".into(),
        });
        assert_eq!(corrupt.to_string(), "Failed to report review");
        assert_eq!(
            corrupt.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
