//! Identity data the default success handler records in the request
//! extensions, and the axum extractors that read it back.
//!
//! - [`IdentityToken`]: the verified token (key `identity-token`)
//! - [`IdentityClaims`]: its claims payload (key `identity-claims`)

use axum::{extract::FromRequestParts, http::request::Parts};
use bearergate_auth::{Header, VerifiedToken};

use crate::utils::errors::GateError;

/// The token string and decoded header of a verified request.
#[derive(Debug, Clone)]
pub struct IdentityToken {
    pub raw: String,
    pub header: Header,
}

/// The claims of a verified request.
#[derive(Debug, Clone)]
pub struct IdentityClaims<C>(pub C);

/// Stores `verified` in `parts.extensions` as [`IdentityToken`] and
/// [`IdentityClaims<C>`].
pub fn store_identity<C>(parts: &mut Parts, verified: VerifiedToken<C>)
where
    C: Clone + Send + Sync + 'static,
{
    parts.extensions.insert(IdentityToken {
        raw: verified.raw,
        header: verified.header,
    });
    parts.extensions.insert(IdentityClaims(verified.claims));
}

impl<S> FromRequestParts<S> for IdentityToken
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityToken>()
            .cloned()
            .ok_or(GateError::MissingIdentity)
    }
}

impl<S, C> FromRequestParts<S> for IdentityClaims<C>
where
    S: Send + Sync,
    C: Clone + Send + Sync + 'static,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityClaims<C>>()
            .cloned()
            .ok_or(GateError::MissingIdentity)
    }
}
