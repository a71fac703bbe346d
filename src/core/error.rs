use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Returns the violated constraint name when `e` is a PostgreSQL unique
/// violation (SQLSTATE 23505).
pub fn unique_violation(e: &sqlx::Error) -> Option<&str> {
    if let sqlx::Error::Database(db_err) = e {
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return db_err.constraint();
        }
    }
    None
}

/// Returns true when `e` is a PostgreSQL foreign key violation (SQLSTATE 23503).
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db_err) if db_err.code() == Some(std::borrow::Cow::Borrowed("23503"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_validation_error_renders_errors_list() {
        let response = AppError::Validation("Slug already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Slug already exists");
        assert_eq!(json["errors"][0], "Slug already exists");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::Internal("index diverged".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Internal server error");
        assert!(json["errors"].is_null());
    }

    #[test]
    fn test_unique_and_foreign_key_violations_are_recognized() {
        use crate::shared::test_helpers::{foreign_key_violation_error, unique_violation_error};

        let unique = unique_violation_error("uq_brands_slug");
        assert_eq!(unique_violation(&unique), Some("uq_brands_slug"));
        assert!(!is_foreign_key_violation(&unique));

        let foreign_key = foreign_key_violation_error("products_brand_id_fkey");
        assert_eq!(unique_violation(&foreign_key), None);
        assert!(is_foreign_key_violation(&foreign_key));
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(unique_violation(&sqlx::Error::RowNotFound).is_none());
        assert!(!is_foreign_key_violation(&sqlx::Error::RowNotFound));
    }
}
