use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::auth::{AuthUseCases, UserRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub users: Arc<dyn UserRepo>,
}
