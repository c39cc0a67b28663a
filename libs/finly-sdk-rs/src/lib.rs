//! Rust client SDK for the finly API.
//!
//! The SDK wraps every outbound request so a session silently survives
//! access-token expiry:
//!
//! - **Transparent refresh** - a 401 triggers one `/auth/refresh-token`
//!   call and a single replay of the failed request
//! - **Single-flight** - concurrent 401s share that one refresh call
//!   instead of racing their own
//! - **Terminal failure** - if the refresh itself fails, every queued
//!   request fails uniformly, stored tokens are cleared, and the
//!   session-end hook fires exactly once
//!
//! # Example
//!
//! ```rust,ignore
//! use finly_sdk::{ApiRequest, FinlyClient};
//!
//! let client = FinlyClient::new("https://api.finly.app")?;
//! client.login("a@x.com", "secret1").await?;
//!
//! // Requests carry the access token and self-heal across expiry.
//! let accounts = client.execute(ApiRequest::get("/accounts")).await?;
//! ```

mod client;
mod coordinator;
mod error;
mod transport;

pub use client::FinlyClient;
pub use error::ClientError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

// Re-export shared types for convenience
pub use finly_types::{FailResponse, TokenPairResponse, UserResponse};
