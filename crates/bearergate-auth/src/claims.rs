//! Claim sets accepted by the verifier.
//!
//! - [`GenericClaims`]: untyped JSON object, used when no claims type is configured
//! - [`ValidateClaims`]: self-validation hook for caller-defined claim types
//! - [`RegisteredClaims`]: the registered claim names with time-based validation

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ClaimsError;

/// Untyped claims payload, exactly as it appears in the token.
pub type GenericClaims = Map<String, Value>;

/// Self-validation run after the signature has been verified.
///
/// Only the typed verification strategy calls this; a failure is reported
/// the same way as a bad signature. `leeway` is the verifier's clock-skew
/// allowance in seconds.
pub trait ValidateClaims {
    fn validate(&self, leeway: u64) -> Result<(), ClaimsError>;
}

/// Convenience getters for the registered claims of a [`GenericClaims`] map.
pub trait ClaimsExt {
    fn subject(&self) -> Option<&str>;
    fn issuer(&self) -> Option<&str>;
    fn expires_at(&self) -> Option<i64>;
}

impl ClaimsExt for GenericClaims {
    fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    fn expires_at(&self) -> Option<i64> {
        self.get("exp").and_then(Value::as_i64)
    }
}

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// The registered claim names (RFC 7519, section 4.1).
///
/// Every field is optional; [`ValidateClaims::validate`] only checks the
/// time-based claims that are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not-before time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued-at time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl RegisteredClaims {
    /// Checks the time-based claims against `now` (Unix seconds), tolerating
    /// `leeway` seconds of clock skew in either direction.
    pub fn validate_at(&self, now: i64, leeway: u64) -> Result<(), ClaimsError> {
        let leeway = i64::try_from(leeway).unwrap_or(i64::MAX);
        let earliest = now.saturating_sub(leeway);
        let latest = now.saturating_add(leeway);

        if self.exp.is_some_and(|exp| earliest > exp) {
            return Err(ClaimsError::Expired);
        }
        if self.iat.is_some_and(|iat| iat > latest) {
            return Err(ClaimsError::IssuedInFuture);
        }
        if self.nbf.is_some_and(|nbf| latest < nbf) {
            return Err(ClaimsError::NotYetValid);
        }
        Ok(())
    }
}

impl ValidateClaims for RegisteredClaims {
    fn validate(&self, leeway: u64) -> Result<(), ClaimsError> {
        self.validate_at(Utc::now().timestamp(), leeway)
    }
}
