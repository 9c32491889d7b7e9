use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::media::MediaError;

/// Errores que un handler puede devolver al cliente.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Error al procesar contraseña")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Error al subir la imagen")]
    MediaUpload(#[from] MediaError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Database(err) => {
                tracing::error!("❌ Error de base de datos: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor".to_string(),
                )
            }
            ApiError::PasswordHash(err) => {
                tracing::error!("❌ Error al hashear: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error al procesar contraseña".to_string(),
                )
            }
            ApiError::MediaUpload(err) => {
                tracing::warn!("❌ Error al subir imagen: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error al subir la imagen".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
