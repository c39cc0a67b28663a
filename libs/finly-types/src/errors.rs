use thiserror::Error;

/// Token verification errors.
///
/// These are typed so callers can distinguish an expired token (worth a
/// refresh attempt) from a token that was never valid.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid signature")]
    SignatureInvalid,

    #[error("Token has expired")]
    Expired,
}
