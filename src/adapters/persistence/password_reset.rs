use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    use_cases::auth::PasswordResetStore,
};

#[async_trait]
impl PasswordResetStore for PostgresPersistence {
    async fn save(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO password_resets (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn consume(&self, token_hash: &str, now: NaiveDateTime) -> AppResult<Option<Uuid>> {
        // Single statement, so redemption is atomic: a second attempt with
        // the same hash finds consumed_at already set and matches nothing.
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE password_resets SET consumed_at = $2 \
             WHERE token_hash = $1 AND consumed_at IS NULL AND expires_at > $2 \
             RETURNING user_id",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(|r| r.0))
    }
}
