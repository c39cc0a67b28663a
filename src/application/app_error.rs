use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("You are not logged in. Please log in to get access.")]
    AuthenticationRequired,

    #[error("Invalid token. Please log in again.")]
    InvalidToken,

    #[error("Your token has expired. Please log in again.")]
    TokenExpired,

    #[error("Password was changed recently. Please log in again.")]
    StalePassword,

    #[error("The user belonging to this token no longer exists.")]
    UserNotFound,

    #[error("Incorrect email or password")]
    IncorrectPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Reset token is invalid or has expired")]
    InvalidOrExpiredResetToken,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
