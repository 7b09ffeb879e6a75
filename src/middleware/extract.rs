//! Token extraction strategies.
//!
//! The default strategy reads `Authorization: Bearer <token>` and falls back
//! to the `_jwt` form field. When both sources come up empty the form-stage
//! error is the one reported.

use axum::http::header;

use crate::middleware::request::GateRequest;
use crate::utils::errors::GateError;

/// Case-sensitive scheme prefix, separator included.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Query string / form field consulted when the header carries no token.
pub const FORM_FIELD: &str = "_jwt";

/// Reads a bearer token from header `name`.
///
/// The prefix is matched on the raw header bytes, so non-ASCII values are
/// accepted as long as the token itself is valid UTF-8.
pub fn token_from_header(request: &GateRequest, name: &str) -> Result<String, GateError> {
    request
        .header(name)
        .and_then(|value| value.as_bytes().strip_prefix(BEARER_PREFIX.as_bytes()))
        .filter(|token| !token.is_empty())
        .and_then(|token| std::str::from_utf8(token).ok())
        .map(str::to_string)
        .ok_or(GateError::EmptyCredentialInHeader)
}

/// Reads a token from the query string or urlencoded form field `name`.
pub fn token_from_form(request: &GateRequest, name: &str) -> Result<String, GateError> {
    request
        .form_value(name)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(GateError::EmptyCredentialInForm)
}

/// Header first, then form.
pub fn default_token_extractor(request: &GateRequest) -> Result<String, GateError> {
    token_from_header(request, header::AUTHORIZATION.as_str())
        .or_else(|_| token_from_form(request, FORM_FIELD))
}
