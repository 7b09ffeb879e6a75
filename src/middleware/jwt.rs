//! JWT authentication gate.
//!
//! [`AuthGate`] runs every request through four steps, stopping at the first
//! failure:
//!
//! 1. **skip**: the skip predicate may wave the request through untouched
//! 2. **extract**: the token extractor pulls the credential (400 when empty);
//!    a form body is buffered and searched only if the first attempt fails
//! 3. **verify**: the [`Verifier`] checks signature and claims
//! 4. **dispatch**: on success the success handler enriches the request
//!    before it reaches the inner service; on failure the failure handler
//!    builds the response (default 401) and the inner service is never called
//!
//! Every hook is a plain function value. [`AuthGate::new`] fills in the
//! defaults; the builder methods replace them.
//!
//! # Example
//!
//! ```ignore
//! use bearergate::middleware::jwt::{AuthGate, skip_paths};
//! use bearergate_auth::{Algorithm, StaticKey, Verifier};
//!
//! let gate = AuthGate::new(Verifier::untyped(
//!     Algorithm::HS256,
//!     StaticKey::from_secret(b"secret"),
//! ))
//! .skipper(skip_paths(vec!["/health".to_string()]));
//!
//! let app = Router::new()
//!     .route("/api/me", get(me))
//!     .layer(gate.into_layer());
//! ```

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use bearergate_auth::{GenericClaims, VerifiedToken, Verifier};
use serde::de::DeserializeOwned;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::metrics::{Decision, record_decision};
use crate::middleware::extract::default_token_extractor;
use crate::middleware::identity::store_identity;
use crate::middleware::request::GateRequest;
use crate::utils::errors::{GateError, status_response};

/// Decides whether a request bypasses authentication.
pub type Skipper = Arc<dyn Fn(&Parts) -> bool + Send + Sync>;

/// Pulls the credential out of a request.
pub type TokenExtractor = Arc<dyn Fn(&GateRequest) -> Result<String, GateError> + Send + Sync>;

/// Runs after successful verification, before the inner service.
pub type ValidHandler<C> = Arc<dyn Fn(&mut Parts, VerifiedToken<C>) + Send + Sync>;

/// Builds the response for a token that failed verification.
pub type InvalidHandler = Arc<dyn Fn(&Parts, &GateError) -> Response + Send + Sync>;

/// Largest form body buffered when looking for a `_jwt` field.
pub const DEFAULT_MAX_FORM_BYTES: usize = 64 * 1024;

pub fn never_skip(_parts: &Parts) -> bool {
    false
}

/// Records the token and claims in the request extensions, see
/// [`IdentityToken`](crate::middleware::identity::IdentityToken) and
/// [`IdentityClaims`](crate::middleware::identity::IdentityClaims).
pub fn default_on_valid<C>(parts: &mut Parts, verified: VerifiedToken<C>)
where
    C: Clone + Send + Sync + 'static,
{
    store_identity(parts, verified);
}

/// `401 Unauthorized` with the reason phrase as body.
pub fn default_on_invalid(_parts: &Parts, _err: &GateError) -> Response {
    status_response(StatusCode::UNAUTHORIZED)
}

/// Skip predicate matching exact request paths.
pub fn skip_paths(paths: Vec<String>) -> impl Fn(&Parts) -> bool + Send + Sync + 'static {
    move |parts: &Parts| paths.iter().any(|path| path == parts.uri.path())
}

/// Result of running a request through the gate.
#[derive(Debug)]
pub enum Outcome {
    /// The skip predicate matched; the request is unchanged.
    Skipped(Request),
    /// The token verified; the request carries the identity data.
    Admitted(Request),
    Rejected(Response),
}

impl Outcome {
    /// The request to forward downstream, or the response to return.
    pub fn into_request(self) -> Result<Request, Response> {
        match self {
            Outcome::Skipped(request) | Outcome::Admitted(request) => Ok(request),
            Outcome::Rejected(response) => Err(response),
        }
    }
}

pub struct AuthGate<C = GenericClaims> {
    skipper: Skipper,
    extractor: TokenExtractor,
    verifier: Verifier<C>,
    on_valid: ValidHandler<C>,
    on_invalid: InvalidHandler,
    max_form_bytes: usize,
}

impl<C> AuthGate<C>
where
    C: Clone + Send + Sync + 'static,
{
    /// Gate with the default hooks: never skip, header-then-form extraction,
    /// identity stored in the request extensions, 401 on failure.
    pub fn new(verifier: Verifier<C>) -> Self {
        Self {
            skipper: Arc::new(never_skip),
            extractor: Arc::new(default_token_extractor),
            verifier,
            on_valid: Arc::new(default_on_valid::<C>),
            on_invalid: Arc::new(default_on_invalid),
            max_form_bytes: DEFAULT_MAX_FORM_BYTES,
        }
    }

    pub fn skipper<F>(mut self, skipper: F) -> Self
    where
        F: Fn(&Parts) -> bool + Send + Sync + 'static,
    {
        self.skipper = Arc::new(skipper);
        self
    }

    pub fn token_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&GateRequest) -> Result<String, GateError> + Send + Sync + 'static,
    {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn on_valid<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Parts, VerifiedToken<C>) + Send + Sync + 'static,
    {
        self.on_valid = Arc::new(handler);
        self
    }

    pub fn on_invalid<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Parts, &GateError) -> Response + Send + Sync + 'static,
    {
        self.on_invalid = Arc::new(handler);
        self
    }

    pub fn max_form_bytes(mut self, limit: usize) -> Self {
        self.max_form_bytes = limit;
        self
    }

    pub fn verifier(&self) -> &Verifier<C> {
        &self.verifier
    }

    pub fn into_layer(self) -> AuthGateLayer<C> {
        AuthGateLayer {
            gate: Arc::new(self),
        }
    }
}

impl<C> AuthGate<C>
where
    C: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Runs skip → extract → verify → dispatch for one request.
    pub async fn authenticate(&self, request: Request) -> Outcome {
        let (parts, mut body) = request.into_parts();

        if (self.skipper)(&parts) {
            debug!(method = %parts.method, path = %parts.uri.path(), "auth gate skipped");
            record_decision(Decision::Skipped);
            return Outcome::Skipped(Request::from_parts(parts, body));
        }

        let mut request = GateRequest::from_parts(parts);
        let mut extracted = (self.extractor)(&request);

        // the form body is only read when headers and query string come up empty
        if !has_token(&extracted) && request.has_form_body() {
            if let Err(err) = request
                .read_form(std::mem::take(&mut body), self.max_form_bytes)
                .await
            {
                return bad_request(request.parts(), Some(&err));
            }
            extracted = (self.extractor)(&request);
        }

        let token = match extracted {
            Ok(token) if !token.is_empty() => token,
            Ok(_) => return bad_request(request.parts(), None),
            Err(err) => return bad_request(request.parts(), Some(&err)),
        };

        let verified = match self.verifier.verify(&token) {
            Ok(verified) => verified,
            Err(err) => {
                let err = GateError::from(err);
                warn!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    error = %err,
                    "jwt rejected"
                );
                record_decision(Decision::Invalid);
                return Outcome::Rejected((self.on_invalid)(request.parts(), &err));
            }
        };

        (self.on_valid)(request.parts_mut(), verified);

        debug!(method = %request.method(), path = %request.uri().path(), "jwt accepted");
        record_decision(Decision::Admitted);

        let (parts, buffered) = request.into_parts();
        let body = buffered.map(Body::from).unwrap_or(body);
        Outcome::Admitted(Request::from_parts(parts, body))
    }

    /// Middleware entry point: forwards to `next` when the gate admits or
    /// skips the request, otherwise returns the rejection.
    pub async fn handle(&self, request: Request, next: Next) -> Response {
        match self.authenticate(request).await.into_request() {
            Ok(request) => next.run(request).await,
            Err(response) => response,
        }
    }
}

fn has_token(extracted: &Result<String, GateError>) -> bool {
    matches!(extracted, Ok(token) if !token.is_empty())
}

fn bad_request(parts: &Parts, err: Option<&GateError>) -> Outcome {
    match err {
        Some(err) => warn!(
            method = %parts.method,
            path = %parts.uri.path(),
            error = %err,
            "no jwt in request"
        ),
        None => warn!(
            method = %parts.method,
            path = %parts.uri.path(),
            "token extractor returned an empty jwt"
        ),
    }
    record_decision(Decision::BadRequest);
    Outcome::Rejected(status_response(StatusCode::BAD_REQUEST))
}

impl<C> Clone for AuthGate<C> {
    fn clone(&self) -> Self {
        Self {
            skipper: Arc::clone(&self.skipper),
            extractor: Arc::clone(&self.extractor),
            verifier: self.verifier.clone(),
            on_valid: Arc::clone(&self.on_valid),
            on_invalid: Arc::clone(&self.on_invalid),
            max_form_bytes: self.max_form_bytes,
        }
    }
}

impl<C> fmt::Debug for AuthGate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("verifier", &self.verifier)
            .field("max_form_bytes", &self.max_form_bytes)
            .finish_non_exhaustive()
    }
}

/// `axum::middleware::from_fn_with_state` adapter.
///
/// ```ignore
/// router.route_layer(middleware::from_fn_with_state(
///     Arc::new(gate),
///     auth_gate_middleware::<GenericClaims>,
/// ))
/// ```
pub async fn auth_gate_middleware<C>(
    State(gate): State<Arc<AuthGate<C>>>,
    request: Request,
    next: Next,
) -> Response
where
    C: DeserializeOwned + Clone + Send + Sync + 'static,
{
    gate.handle(request, next).await
}

/// Layer that puts an [`AuthGate`] in front of a service.
pub struct AuthGateLayer<C = GenericClaims> {
    gate: Arc<AuthGate<C>>,
}

impl<C> Clone for AuthGateLayer<C> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<S, C> Layer<S> for AuthGateLayer<C> {
    type Service = AuthGateService<S, C>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthGateService {
            inner,
            gate: Arc::clone(&self.gate),
        }
    }
}

pub struct AuthGateService<S, C = GenericClaims> {
    inner: S,
    gate: Arc<AuthGate<C>>,
}

impl<S: Clone, C> Clone for AuthGateService<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<S, C> Service<Request<Body>> for AuthGateService<S, C>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    C: DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let gate = Arc::clone(&self.gate);
        // the clone is not ready; keep it and call the one poll_ready prepared
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            match gate.authenticate(request).await.into_request() {
                Ok(request) => ready_inner.call(request).await,
                Err(response) => Ok(response),
            }
        })
    }
}
