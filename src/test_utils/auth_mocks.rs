//! In-memory mock implementations of the auth repository traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::password,
    use_cases::auth::{EmailSender, PasswordResetStore, UserRecord, UserRepo},
};

/// Create a test user with sensible defaults. The password is hashed for
/// real so login paths exercise the argon2 comparison.
pub fn create_test_user(
    email: &str,
    plain_password: &str,
    overrides: impl FnOnce(&mut UserRecord),
) -> UserRecord {
    let mut user = UserRecord {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: "Test User".to_string(),
        password_hash: password::hash(plain_password).unwrap(),
        password_changed_at: None,
        created_at: Some(Utc::now().naive_utc()),
    };
    overrides(&mut user);
    user
}

// ============================================================================
// InMemoryUserRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    users: Mutex<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserRecord) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: Uuid) -> Option<UserRecord> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn set_password_changed_at(&self, id: Uuid, changed_at: NaiveDateTime) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.password_changed_at = Some(changed_at);
        }
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, email: &str, name: &str, password_hash: &str) -> AppResult<UserRecord> {
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            password_changed_at: None,
            created_at: Some(Utc::now().naive_utc()),
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        changed_at: NaiveDateTime,
    ) -> AppResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.password_hash = password_hash.to_string();
            user.password_changed_at = Some(changed_at);
        }
        Ok(())
    }
}

// ============================================================================
// InMemoryResetStore
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResetRecord {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: NaiveDateTime,
    pub consumed_at: Option<NaiveDateTime>,
}

#[derive(Default)]
pub struct InMemoryResetStore {
    records: Mutex<Vec<ResetRecord>>,
}

impl InMemoryResetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ResetRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl PasswordResetStore for InMemoryResetStore {
    async fn save(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()> {
        self.records.lock().unwrap().push(ResetRecord {
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
            consumed_at: None,
        });
        Ok(())
    }

    async fn consume(&self, token_hash: &str, now: NaiveDateTime) -> AppResult<Option<Uuid>> {
        let mut records = self.records.lock().unwrap();
        for record in records.iter_mut() {
            if record.token_hash == token_hash
                && record.consumed_at.is_none()
                && record.expires_at > now
            {
                record.consumed_at = Some(now);
                return Ok(Some(record.user_id));
            }
        }
        Ok(None)
    }
}

// ============================================================================
// CapturingEmailSender
// ============================================================================

#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Default)]
pub struct CapturingEmailSender {
    emails: Mutex<Vec<CapturedEmail>>,
}

impl CapturingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured_emails(&self) -> Vec<CapturedEmail> {
        self.emails.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for CapturingEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.emails.lock().unwrap().push(CapturedEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}
