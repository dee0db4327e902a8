//! Error types for the web service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Field errors collected while validating a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

/// Failure kinds reported by the service layer
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The addressed record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Submitted values were rejected
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// A unique name, email or movie identity is already taken
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// The principal may not act on the record
    #[error("Forbidden")]
    Forbidden,

    /// Persistence failure
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Anything else, e.g. password hashing
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Validation failure on a single field
    pub fn invalid(field: &'static str, message: &'static str) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        ServiceError::Validation(errors)
    }

    /// HTTP status matching the failure kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Type alias for service results
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for handlers that cannot answer with a view or redirect
#[derive(Error, Debug)]
pub enum ApiError {
    /// Signed in but lacking the role
    #[error("Forbidden")]
    Forbidden,

    /// Service failure
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ApiError::Service(ServiceError::Database(_) | ServiceError::Internal(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Service(e) => (e.status_code(), e.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
