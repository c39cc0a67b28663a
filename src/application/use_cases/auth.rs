use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use chrono::{NaiveDateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::password;

/// Reset tokens die ten minutes after issuance.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub password_changed_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;
    async fn create(&self, email: &str, name: &str, password_hash: &str) -> AppResult<UserRecord>;
    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        changed_at: NaiveDateTime,
    ) -> AppResult<()>;
}

#[async_trait]
pub trait PasswordResetStore: Send + Sync {
    async fn save(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()>;

    /// Consume a reset token. Returns the owning user when the hash matches a
    /// live, unexpired record, and invalidates that record so the same raw
    /// token can never be redeemed twice.
    async fn consume(&self, token_hash: &str, now: NaiveDateTime) -> AppResult<Option<Uuid>>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AuthUseCases {
    users: Arc<dyn UserRepo>,
    resets: Arc<dyn PasswordResetStore>,
    email: Arc<dyn EmailSender>,
}

impl AuthUseCases {
    pub fn new(
        users: Arc<dyn UserRepo>,
        resets: Arc<dyn PasswordResetStore>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            users,
            resets,
            email,
        }
    }

    #[instrument(skip(self, password, password_confirm))]
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        password_confirm: &str,
    ) -> AppResult<UserRecord> {
        if password != password_confirm {
            return Err(AppError::PasswordMismatch);
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::InvalidInput("Email is already registered".into()));
        }
        let password_hash = password::hash(password)?;
        self.users.create(email, name, &password_hash).await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<UserRecord> {
        // Unknown email and wrong password are indistinguishable to the caller.
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AppError::IncorrectPassword);
        };
        if !password::matches(password, &user.password_hash)? {
            return Err(AppError::IncorrectPassword);
        }
        Ok(user)
    }

    /// Issues a single-use opaque reset token. Only its hash is persisted;
    /// the raw value goes out by email and is returned to the route layer
    /// for the development-only echo path.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> AppResult<String> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AppError::UserNotFound);
        };

        let raw = generate_token();
        let token_hash = hash_token(&raw);
        let expires_at =
            (Utc::now() + chrono::Duration::minutes(RESET_TOKEN_TTL_MINUTES)).naive_utc();
        self.resets.save(user.id, &token_hash, expires_at).await?;

        self.email
            .send(
                &user.email,
                "Your password reset token (valid for 10 minutes)",
                &reset_email_html(&raw),
            )
            .await?;

        Ok(raw)
    }

    #[instrument(skip(self, raw_token, password, password_confirm))]
    pub async fn reset_password(
        &self,
        raw_token: &str,
        password: &str,
        password_confirm: &str,
    ) -> AppResult<UserRecord> {
        if password != password_confirm {
            return Err(AppError::PasswordMismatch);
        }

        let token_hash = hash_token(raw_token);
        let now = Utc::now().naive_utc();
        let Some(user_id) = self.resets.consume(&token_hash, now).await? else {
            return Err(AppError::InvalidOrExpiredResetToken);
        };
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Err(AppError::UserNotFound);
        };

        // Stamping password_changed_at retroactively kills every access token
        // issued before this instant.
        let password_hash = password::hash(password)?;
        let changed_at = Utc::now().naive_utc();
        self.users
            .update_password(user.id, &password_hash, changed_at)
            .await?;

        Ok(UserRecord {
            password_hash,
            password_changed_at: Some(changed_at),
            ..user
        })
    }

    #[instrument(skip(self, current, new_password, new_password_confirm))]
    pub async fn update_password(
        &self,
        user: &UserRecord,
        current: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> AppResult<UserRecord> {
        if new_password != new_password_confirm {
            return Err(AppError::PasswordMismatch);
        }
        if !password::matches(current, &user.password_hash)? {
            return Err(AppError::IncorrectPassword);
        }

        let password_hash = password::hash(new_password)?;
        let changed_at = Utc::now().naive_utc();
        self.users
            .update_password(user.id, &password_hash, changed_at)
            .await?;

        Ok(UserRecord {
            password_hash,
            password_changed_at: Some(changed_at),
            ..user.clone()
        })
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

fn reset_email_html(raw_token: &str) -> String {
    format!(
        "<p>Forgot your password? Submit a PATCH request to \
         <code>/auth/reset-password/{raw_token}</code> with your new password. \
         If you didn't ask for a reset, ignore this email.</p>"
    )
}
