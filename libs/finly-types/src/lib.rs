//! Shared types for finly authentication.
//!
//! This crate provides:
//! - The signed token claims structure (`TokenClaims`)
//! - The token codec (`codec::sign` / `codec::verify` with typed errors)
//! - API response types shared between the backend and the SDK

mod claims;
pub mod codec;
mod errors;
mod responses;

pub use claims::TokenClaims;
pub use errors::TokenError;
pub use responses::{FailResponse, TokenPairResponse, UserResponse};
