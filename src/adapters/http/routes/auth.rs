//! Authentication routes: register, login, logout, token refresh, and the
//! password reset/update lifecycle.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use finly_types::{TokenError, TokenPairResponse, UserResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{
            ACCESS_COOKIE, CurrentUser, REFRESH_COOKIE, locate_refresh_token, require_auth,
        },
    },
    app_error::{AppError, AppResult},
    application::jwt,
    application::validators::is_valid_email,
    use_cases::auth::UserRecord,
};

#[derive(Deserialize)]
struct RegisterPayload {
    email: String,
    name: String,
    password: String,
    password_confirm: String,
}

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct ForgotPasswordPayload {
    email: String,
}

#[derive(Deserialize)]
struct ResetPasswordPayload {
    password: String,
    password_confirm: String,
}

#[derive(Deserialize)]
struct UpdatePasswordPayload {
    current_password: String,
    new_password: String,
    new_password_confirm: String,
}

pub fn router(app_state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/{token}", patch(reset_password))
        .route("/refresh-token", post(refresh_token));

    let protected = Router::new()
        .route("/update-password", patch(update_password))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(app_state, require_auth));

    public.merge(protected)
}

fn append_cookie(headers: &mut HeaderMap, cookie: Cookie<'_>) -> AppResult<()> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|_| AppError::Internal("Failed to build cookie header".into()))?;
    headers.append("set-cookie", value);
    Ok(())
}

fn token_cookie(
    name: &'static str,
    value: String,
    max_age: time::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Issues a fresh pair and answers with it both ways: as `jwt`/`refreshJwt`
/// cookies and in the response body for non-cookie clients.
fn issue_session(
    app_state: &AppState,
    user: &UserRecord,
    status: StatusCode,
) -> AppResult<(StatusCode, HeaderMap, Json<TokenPairResponse>)> {
    let pair = jwt::issue_pair(user.id, &app_state.config)?;
    let secure = app_state.config.cookie_secure;

    let mut headers = HeaderMap::new();
    append_cookie(
        &mut headers,
        token_cookie(
            ACCESS_COOKIE,
            pair.access.clone(),
            app_state.config.access_token_ttl,
            secure,
        ),
    )?;
    append_cookie(
        &mut headers,
        token_cookie(
            REFRESH_COOKIE,
            pair.refresh.clone(),
            app_state.config.refresh_token_ttl,
            secure,
        ),
    )?;

    Ok((
        status,
        headers,
        Json(TokenPairResponse {
            token: pair.access,
            refresh_token: pair.refresh,
        }),
    ))
}

async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let email = payload.email.trim();
    if !is_valid_email(email) {
        return Err(AppError::InvalidInput("Invalid email format".into()));
    }

    let user = app_state
        .auth_use_cases
        .register(
            email,
            payload.name.trim(),
            &payload.password,
            &payload.password_confirm,
        )
        .await?;

    issue_session(&app_state, &user, StatusCode::CREATED)
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .login(payload.email.trim(), &payload.password)
        .await?;

    issue_session(&app_state, &user, StatusCode::OK)
}

async fn logout(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut headers = HeaderMap::new();
    let secure = app_state.config.cookie_secure;
    append_cookie(
        &mut headers,
        token_cookie(ACCESS_COOKIE, String::new(), time::Duration::ZERO, secure),
    )?;
    append_cookie(
        &mut headers,
        token_cookie(REFRESH_COOKIE, String::new(), time::Duration::ZERO, secure),
    )?;

    Ok((StatusCode::OK, headers, Json(json!({"status": "success"}))))
}

async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> AppResult<impl IntoResponse> {
    let email = payload.email.trim();
    if !is_valid_email(email) {
        return Err(AppError::InvalidInput("Invalid email format".into()));
    }

    let raw_token = app_state.auth_use_cases.forgot_password(email).await?;

    // Development diagnostic only: the raw token is echoed when explicitly
    // enabled, never by default. Production delivery is the email.
    let body = if app_state.config.expose_reset_token {
        json!({"status": "success", "resetToken": raw_token})
    } else {
        json!({"status": "success", "message": "Reset token sent to email"})
    };

    Ok((StatusCode::OK, Json(body)))
}

async fn reset_password(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .reset_password(&token, &payload.password, &payload.password_confirm)
        .await?;

    issue_session(&app_state, &user, StatusCode::OK)
}

/// Rotates the pair: a valid refresh token buys a brand-new access token
/// and a brand-new refresh token, never a reuse of the old one.
async fn refresh_token(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    cookies: CookieJar,
) -> AppResult<impl IntoResponse> {
    let token =
        locate_refresh_token(&headers, &cookies).ok_or(AppError::AuthenticationRequired)?;

    let claims =
        jwt::verify(&token, &app_state.config.refresh_token_secret).map_err(|e| match e {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::SignatureInvalid | TokenError::Malformed(_) => AppError::InvalidToken,
        })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
    let user = app_state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    issue_session(&app_state, &user, StatusCode::OK)
}

async fn update_password(
    State(app_state): State<AppState>,
    axum::Extension(CurrentUser(user)): axum::Extension<CurrentUser>,
    Json(payload): Json<UpdatePasswordPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .update_password(
            &user,
            &payload.current_password,
            &payload.new_password,
            &payload.new_password_confirm,
        )
        .await?;

    // A fresh pair so the caller is not logged out by their own change.
    issue_session(&app_state, &user, StatusCode::OK)
}

async fn me(
    axum::Extension(CurrentUser(user)): axum::Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(UserResponse {
        id: user.id.to_string(),
        email: user.email,
        name: user.name,
        created_at: user.created_at.map(|t| t.and_utc().to_rfc3339()),
    })
}
