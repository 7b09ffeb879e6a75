use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bearergate_auth::VerificationError;
use thiserror::Error;

/// Reasons the gate refuses a request.
///
/// Both extraction errors answer 400; they are kept apart for diagnostics.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("empty jwt in request header")]
    EmptyCredentialInHeader,
    #[error("empty jwt in query string or post form")]
    EmptyCredentialInForm,
    #[error("unreadable form body: {0}")]
    UnreadableForm(String),
    #[error("jwt verification failed: {0}")]
    VerificationFailed(#[from] VerificationError),
    /// A handler asked for identity data on a route the gate does not cover.
    #[error("identity missing from request context - auth gate not configured")]
    MissingIdentity,
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::EmptyCredentialInHeader
            | GateError::EmptyCredentialInForm
            | GateError::UnreadableForm(_) => StatusCode::BAD_REQUEST,
            GateError::VerificationFailed(_) => StatusCode::UNAUTHORIZED,
            GateError::MissingIdentity => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        status_response(self.status())
    }
}

/// Response carrying `status` and its canonical reason phrase as the body,
/// e.g. `401` / `Unauthorized`.
pub fn status_response(status: StatusCode) -> Response {
    let body = status.canonical_reason().unwrap_or_default();
    (status, body).into_response()
}
