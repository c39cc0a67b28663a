use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    use_cases::auth::{UserRecord, UserRepo},
};

// User struct as stored in the db.
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    password_changed_at: Option<NaiveDateTime>,
    created_at: Option<NaiveDateTime>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            password_changed_at: row.password_changed_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, password_hash, password_changed_at, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(UserRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, password_hash, password_changed_at, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(UserRecord::from))
    }

    async fn create(&self, email: &str, name: &str, password_hash: &str) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, email, name, password_hash) VALUES ($1, $2, $3, $4) \
             RETURNING id, email, name, password_hash, password_changed_at, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.into())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        changed_at: NaiveDateTime,
    ) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, password_changed_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(changed_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
