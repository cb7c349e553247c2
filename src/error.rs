use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;

use crate::views::ViewError;

/// Erreur générique d'accès aux données.
///
/// Le texte du driver est journalisé au moment de la conversion puis
/// abandonné: seul le nom de l'opération remonte vers les contrôleurs.
#[derive(Debug, Error)]
#[error("data access failure: {operation}")]
pub struct DataAccessError {
    pub operation: &'static str,
}

impl DataAccessError {
    pub fn log(operation: &'static str, err: DbErr) -> Self {
        tracing::error!(operation, error = %err, "database operation failed");
        Self { operation }
    }
}

/// Erreurs remontées par les actions des contrôleurs.
/// Elles se terminent toutes par la page d'erreur (ou un JSON 500 en dernier recours).
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("{message}")]
    Status { code: StatusCode, message: String },
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::Status {
            code: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Status {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Status { code, .. } => *code,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "code": self.status_code().as_u16()
        }))
    }
}
