use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use finly_types::TokenError;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState, app_error::AppError, application::jwt,
    use_cases::auth::UserRecord,
};

pub const ACCESS_COOKIE: &str = "jwt";
pub const REFRESH_COOKIE: &str = "refreshJwt";

/// Identity attached to the request once the auth gate passes.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Ordered, total lookup for the access token: the bearer header wins,
/// the `jwt` cookie is the fallback.
pub fn locate_access_token(headers: &HeaderMap, cookies: &CookieJar) -> Option<String> {
    bearer_token(headers).or_else(|| cookies.get(ACCESS_COOKIE).map(|c| c.value().to_string()))
}

/// Ordered, total lookup for the refresh token: the `refreshJwt` cookie
/// wins, the bearer header is the fallback.
pub fn locate_refresh_token(headers: &HeaderMap, cookies: &CookieJar) -> Option<String> {
    cookies
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer_token(headers))
}

pub async fn require_auth(
    State(app_state): State<AppState>,
    cookies: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = locate_access_token(request.headers(), &cookies)
        .ok_or(AppError::AuthenticationRequired)?;

    let claims =
        jwt::verify(&token, &app_state.config.access_token_secret).map_err(|e| match e {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::SignatureInvalid | TokenError::Malformed(_) => AppError::InvalidToken,
        })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
    let user = app_state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    // Tokens minted before the last password change are dead. Compared at
    // second resolution, matching the claim's granularity.
    if let Some(changed_at) = user.password_changed_at
        && claims.iat < changed_at.and_utc().timestamp()
    {
        return Err(AppError::StalePassword);
    }

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
