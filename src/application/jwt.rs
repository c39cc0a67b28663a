use finly_types::{TokenClaims, TokenError, codec};
use secrecy::ExposeSecret;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::infra::config::AppConfig;

/// A freshly issued access/refresh token pair.
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub fn issue(user_id: Uuid, secret: &secrecy::SecretString, ttl: Duration) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + ttl.whole_seconds(),
    };
    codec::sign(&claims, secret.expose_secret()).map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify(token: &str, secret: &secrecy::SecretString) -> Result<TokenClaims, TokenError> {
    codec::verify(token, secret.expose_secret())
}

/// Issues a new pair, each class signed with its own secret and TTL.
pub fn issue_pair(user_id: Uuid, config: &AppConfig) -> AppResult<TokenPair> {
    Ok(TokenPair {
        access: issue(user_id, &config.access_token_secret, config.access_token_ttl)?,
        refresh: issue(user_id, &config.refresh_token_secret, config.refresh_token_ttl)?,
    })
}
