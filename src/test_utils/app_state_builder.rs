//! Test app state builder for HTTP-level integration testing.

use std::sync::Arc;

use secrecy::SecretString;
use time::Duration;

use crate::{
    adapters::http::app_state::AppState,
    infra::config::AppConfig,
    test_utils::{CapturingEmailSender, InMemoryResetStore, InMemoryUserRepo},
    use_cases::auth::{AuthUseCases, PasswordResetStore, UserRecord, UserRepo},
};

/// AppConfig with test values: real secrets per token class, short access
/// TTL, insecure cookies (tests run over plain HTTP).
pub fn test_config() -> AppConfig {
    AppConfig {
        access_token_secret: SecretString::new("test-access-secret".into()),
        refresh_token_secret: SecretString::new("test-refresh-secret".into()),
        access_token_ttl: Duration::seconds(900),
        refresh_token_ttl: Duration::days(30),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origin: "http://localhost:3000".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        cookie_secure: false,
        expose_reset_token: false,
        resend_api_key: SecretString::new("test-resend-key".into()),
        email_from: "noreply@finly.test".to_string(),
    }
}

pub struct TestAppStateBuilder {
    users: Vec<UserRecord>,
    expose_reset_token: bool,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            expose_reset_token: false,
        }
    }

    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.users.push(user);
        self
    }

    pub fn expose_reset_token(mut self, expose: bool) -> Self {
        self.expose_reset_token = expose;
        self
    }

    pub fn build(
        self,
    ) -> (
        AppState,
        Arc<InMemoryUserRepo>,
        Arc<InMemoryResetStore>,
        Arc<CapturingEmailSender>,
    ) {
        let users = Arc::new(InMemoryUserRepo::new());
        for user in self.users {
            users.insert(user);
        }
        let resets = Arc::new(InMemoryResetStore::new());
        let email = Arc::new(CapturingEmailSender::new());

        let mut config = test_config();
        config.expose_reset_token = self.expose_reset_token;

        let auth_use_cases = AuthUseCases::new(
            users.clone() as Arc<dyn UserRepo>,
            resets.clone() as Arc<dyn PasswordResetStore>,
            email.clone(),
        );

        let app_state = AppState {
            config: Arc::new(config),
            auth_use_cases: Arc::new(auth_use_cases),
            users: users.clone(),
        };

        (app_state, users, resets, email)
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
