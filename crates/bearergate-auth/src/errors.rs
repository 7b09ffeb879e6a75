//! Error types produced while verifying a bearer token.

use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Rejection raised by a claims type's self-validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("token is expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token used before issued")]
    IssuedInFuture,
    #[error("invalid claims: {0}")]
    Invalid(String),
}

/// Failure of a key-resolution function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyResolutionError {
    #[error("token header carries no key id")]
    MissingKeyId,
    #[error("unknown key id `{0}`")]
    UnknownKeyId(String),
    #[error("no key registered for algorithm {0:?}")]
    UnsupportedAlgorithm(Algorithm),
    #[error("{0}")]
    Other(String),
}

/// Everything that can go wrong between receiving a token string and
/// handing back validated claims.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// Malformed token, bad signature, algorithm mismatch or a failed
    /// registered-claim check (`exp`, `nbf`, `iss`, `aud`).
    #[error("token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("key resolution failed: {0}")]
    KeyResolution(#[from] KeyResolutionError),
    #[error("claims rejected: {0}")]
    Claims(#[from] ClaimsError),
}
