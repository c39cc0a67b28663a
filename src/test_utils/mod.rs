//! Test utilities for HTTP-level and use-case-level testing.
//!
//! This module provides:
//! - In-memory mock implementations of the auth repository traits
//! - A test data factory for user records
//! - `TestAppStateBuilder` for constructing `AppState` without Postgres

mod app_state_builder;
mod auth_mocks;

pub use app_state_builder::*;
pub use auth_mocks::*;
