use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;

pub struct AppConfig {
    /// Signs access tokens. Independent from the refresh secret, so one
    /// token class can never stand in for the other.
    pub access_token_secret: SecretString,
    pub refresh_token_secret: SecretString,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    pub database_url: String,
    /// Mark auth cookies `Secure`. Disable only when serving plain HTTP in
    /// local development.
    pub cookie_secure: bool,
    /// Echo the raw password-reset token in the forgot-password response.
    /// Development diagnostic only; must stay off in production.
    pub expose_reset_token: bool,
    pub resend_api_key: SecretString,
    pub email_from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let access_token_secret: SecretString =
            SecretString::new(require_env("ACCESS_TOKEN_SECRET").into());
        let refresh_token_secret: SecretString =
            SecretString::new(require_env("REFRESH_TOKEN_SECRET").into());

        let access_token_ttl_secs: i64 = env::var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or("900".to_string())
            .parse()
            .expect("ACCESS_TOKEN_TTL_SECS must be a valid number");

        let refresh_token_ttl_days: i64 = env::var("REFRESH_TOKEN_TTL_DAYS")
            .unwrap_or("30".to_string())
            .parse()
            .expect("REFRESH_TOKEN_TTL_DAYS must be a valid number");

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or("127.0.0.1:3001".to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let cors_origin: HeaderValue = env::var("CORS_ORIGIN")
            .unwrap_or("http://localhost:3000".to_string())
            .parse()
            .expect("CORS_ORIGIN must be a valid header value");

        let database_url = require_env("DATABASE_URL");
        let cookie_secure: bool = env::var("COOKIE_SECURE")
            .unwrap_or("true".to_string())
            .parse()
            .expect("COOKIE_SECURE must be true or false");
        let expose_reset_token: bool = env::var("EXPOSE_RESET_TOKEN")
            .unwrap_or("false".to_string())
            .parse()
            .expect("EXPOSE_RESET_TOKEN must be true or false");

        let resend_api_key = SecretString::new(require_env("RESEND_API_KEY").into());
        let email_from = require_env("EMAIL_FROM");

        Self {
            access_token_secret,
            refresh_token_secret,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            refresh_token_ttl: Duration::days(refresh_token_ttl_days),
            bind_addr,
            cors_origin,
            database_url,
            cookie_secure,
            expose_reset_token,
            resend_api_key,
            email_from,
        }
    }
}

fn require_env(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}
