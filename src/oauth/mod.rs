//! OAuth 2.0 client-credentials authentication for OneLogin
//!
//! Features:
//! - Lazy token acquisition on first request
//! - In-place refresh once `created_at + expires_in` has passed
//! - Single in-flight refresh shared by concurrent callers
//! - Bearer authorization of every outbound request

mod client;
mod token;

pub use client::{DEFAULT_TOKEN_PATH, OneLoginClient};
pub use token::TokenInfo;
