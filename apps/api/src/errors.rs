use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::embedding::EmbeddingError;
use crate::matching::MatchError;
use crate::roadmap::RoadmapError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dimension mismatch: query has {actual}, catalog has {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::DimensionMismatch { expected, actual } => {
                AppError::DimensionMismatch { expected, actual }
            }
            MatchError::InvalidArgument(msg) => AppError::Validation(msg),
        }
    }
}

impl From<EmbeddingError> for AppError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::EmptyInput => AppError::Validation("Text cannot be empty".to_string()),
            other => AppError::Embedding(other.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<RoadmapError> for AppError {
    fn from(err: RoadmapError) -> Self {
        match err {
            RoadmapError::NoMatchingEntries(msg) => AppError::NotFound(msg),
            RoadmapError::InvalidArgument(msg) => AppError::Validation(msg),
            RoadmapError::DimensionMismatch { expected, actual } => {
                AppError::DimensionMismatch { expected, actual }
            }
            RoadmapError::Embedding(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::DimensionMismatch { .. } => {
                tracing::error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DIMENSION_MISMATCH",
                    "Embedding model does not match the catalog".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Embedding(msg) => {
                tracing::error!("Embedding error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EMBEDDING_ERROR",
                    "The embedding service failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_entries_is_not_found() {
        let err: AppError = RoadmapError::NoMatchingEntries("none".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_argument_is_bad_request() {
        let err: AppError = MatchError::InvalidArgument("limit".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_blank_embedding_input_is_bad_request() {
        let err: AppError = RoadmapError::Embedding(EmbeddingError::EmptyInput).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_dimension_mismatch_is_server_error() {
        let err: AppError = RoadmapError::DimensionMismatch {
            expected: 384,
            actual: 768,
        }
        .into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
