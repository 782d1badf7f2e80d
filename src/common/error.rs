// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Missing required field: {0}")]
    RequiredField(&'static str),

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Visit not found")]
    VisitNotFound,

    #[error("Unknown personnel: {0}")]
    UnknownPersonnel(String),

    #[error("Deletion must be confirmed")]
    ConfirmationRequired,

    #[error("Record already exists")]
    DuplicateRecord,

    #[error("Invalid geo configuration: {0}")]
    GeoConfig(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Detalhes campo a campo da validação do payload.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::RequiredField(field) => (StatusCode::BAD_REQUEST, format!("The field '{}' is required.", field)),
            AppError::CustomerNotFound => (StatusCode::NOT_FOUND, "Customer not found.".to_string()),
            AppError::VisitNotFound => (StatusCode::NOT_FOUND, "Visit not found.".to_string()),
            AppError::UnknownPersonnel(name) => (StatusCode::FORBIDDEN, format!("'{}' is not on the personnel roster.", name)),
            AppError::ConfirmationRequired => (StatusCode::BAD_REQUEST, "Deletion requires confirm=true.".to_string()),
            AppError::DuplicateRecord => (StatusCode::CONFLICT, "A record with this id already exists.".to_string()),

            // Todo o resto é 500; o detalhe vai só para o log.
            ref e => {
                tracing::error!("Internal server error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
