//! Cross-origin settings for the demo server.
//!
//! - `ALLOWED_ORIGINS`: comma-separated origins allowed to call the API with
//!   credentials (default: `http://localhost:3000,http://localhost:5173`)
//!
//! The CORS layer sits outside the auth gate, so these origins can send
//! preflight requests without a token.

use std::env;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl CorsConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// A blank `ALLOWED_ORIGINS` allows no cross-origin callers at all.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());

        Self {
            allowed_origins: raw
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }
}
