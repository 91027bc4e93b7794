//! Error handling for the contactbook server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contactbook::prelude::{ContactError, ContactStatus, StorageError};
use thiserror::Error;

use crate::api::dto::MessageResponse;

/// Message returned for every unexpected failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";

/// Server error types.
///
/// Every variant except [`ServerError::Internal`] carries the message sent
/// to the client.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Action not allowed by server configuration
    #[error("{0}")]
    Forbidden(String),

    /// Invalid input
    #[error("{0}")]
    BadRequest(String),

    /// Resource does not exist or is not visible to the caller
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure; the detail is logged, never returned
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client
    pub fn public_message(&self) -> String {
        match self {
            ServerError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let ServerError::Internal(ref detail) = self {
            tracing::error!(error = %detail, "Request failed");
        }

        let status = self.status_code();
        let body = MessageResponse {
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ContactError> for ServerError {
    fn from(error: ContactError) -> Self {
        match error {
            ContactError::Validation(message) => ServerError::BadRequest(message),
            ContactError::SelfRequest => bad_request("No puedes agregarte a ti mismo"),
            ContactError::NotFound { resource, .. } => ServerError::NotFound(
                match resource {
                    "User" => "Usuario no encontrado",
                    "Request" => "Solicitud no encontrada",
                    "Contact" => "Contacto no encontrado",
                    _ => "Recurso no encontrado",
                }
                .to_string(),
            ),
            ContactError::AlreadyRelated { status, .. } => bad_request(match status {
                ContactStatus::Pending => "Ya tienes una solicitud pendiente con este usuario",
                ContactStatus::Accepted => "Este usuario ya está en tus contactos",
                ContactStatus::Blocked => "No puedes agregar a este usuario",
            }),
            ContactError::Storage(e) => ServerError::from(e),
        }
    }
}

impl From<StorageError> for ServerError {
    fn from(error: StorageError) -> Self {
        ServerError::Internal(error.to_string())
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Helper function to create a bad request error
pub fn bad_request(message: &str) -> ServerError {
    ServerError::BadRequest(message.to_string())
}

/// Helper function to create a not found error
pub fn not_found(message: &str) -> ServerError {
    ServerError::NotFound(message.to_string())
}
