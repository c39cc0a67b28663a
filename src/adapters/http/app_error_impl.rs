use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use finly_types::FailResponse;

use crate::app_error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        let (status, message) = match &self {
            AppError::AuthenticationRequired
            | AppError::InvalidToken
            | AppError::TokenExpired
            | AppError::StalePassword
            | AppError::UserNotFound
            | AppError::IncorrectPassword
            | AppError::InvalidOrExpiredResetToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::PasswordMismatch | AppError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            // Internal details never reach the client.
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".into()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into()),
        };

        (status, Json(FailResponse::new(message))).into_response()
    }
}
