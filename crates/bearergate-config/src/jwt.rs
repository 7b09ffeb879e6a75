//! Gate configuration: how bearer tokens are verified and which paths bypass
//! verification.
//!
//! # Configuration
//!
//! - `JWT_SECRET`: HMAC secret (default: `your-secret-key-change-in-production`)
//! - `JWT_ALGORITHM`: accepted signing algorithm (default: `HS256`)
//! - `JWT_ISSUER`: expected `iss`, unchecked when unset
//! - `JWT_AUDIENCE`: expected `aud`, unchecked when unset
//! - `JWT_LEEWAY`: clock skew in seconds (default: 60)
//! - `AUTH_SKIP_PATHS`: comma-separated paths that bypass the gate (default: `/health,/metrics`)
//! - `AUTH_MAX_FORM_BYTES`: largest form body buffered for `_jwt` lookup (default: 65536)

use std::env;

pub const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";
pub const DEFAULT_ALGORITHM: &str = "HS256";
pub const DEFAULT_LEEWAY: u64 = 60;
pub const DEFAULT_SKIP_PATHS: &str = "/health,/metrics";
pub const DEFAULT_MAX_FORM_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateConfig {
    pub secret: String,
    /// Algorithm name as written in the `alg` header, e.g. `HS256`.
    pub algorithm: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway: u64,
    pub skip_paths: Vec<String>,
    pub max_form_bytes: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl GateConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secret: lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_SECRET.to_string()),
            algorithm: lookup("JWT_ALGORITHM")
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
            issuer: lookup("JWT_ISSUER").filter(|s| !s.trim().is_empty()),
            audience: lookup("JWT_AUDIENCE").filter(|s| !s.trim().is_empty()),
            leeway: lookup("JWT_LEEWAY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LEEWAY),
            skip_paths: split_list(
                &lookup("AUTH_SKIP_PATHS").unwrap_or_else(|| DEFAULT_SKIP_PATHS.to_string()),
            ),
            max_form_bytes: lookup("AUTH_MAX_FORM_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_FORM_BYTES),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
