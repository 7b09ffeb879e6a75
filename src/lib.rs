//! # bearergate
//!
//! JWT bearer authentication middleware for axum/tower services.
//!
//! The [`AuthGate`] sits in front of a service and, per request:
//!
//! 1. lets requests matching its skip predicate through untouched
//! 2. extracts the token from `Authorization: Bearer <token>`, falling back to
//!    the `_jwt` query/form field (400 Bad Request when there is none)
//! 3. verifies it with a [`Verifier`](bearergate_auth::Verifier) built from an
//!    algorithm and a key-resolution function (401 Unauthorized on failure)
//! 4. stores the verified token and claims in the request extensions and
//!    forwards the request
//!
//! Extraction, success and failure handling, and the skip decision are all
//! replaceable hooks. Claims are either an untyped JSON map or a caller type
//! implementing [`ValidateClaims`](bearergate_auth::ValidateClaims).
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── bearergate-auth/     # claims, key resolution, Verifier
//! └── bearergate-config/   # environment configuration
//! src/
//! ├── middleware/          # AuthGate, extractors, identity extractors
//! ├── modules/profile/     # demo API guarded by the gate
//! ├── utils/errors.rs      # GateError and status responses
//! ├── logging.rs           # tracing setup and request logging
//! ├── metrics.rs           # Prometheus metrics
//! ├── router.rs            # demo router
//! └── state.rs             # configuration → AuthGate
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use bearergate::AuthGate;
//! use bearergate_auth::{Algorithm, StaticKey, Verifier};
//!
//! let gate = AuthGate::new(Verifier::untyped(
//!     Algorithm::HS256,
//!     StaticKey::from_secret(b"secret"),
//! ));
//!
//! let app = Router::new()
//!     .route("/api/me", get(me))
//!     .layer(gate.into_layer());
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! JWT_ALGORITHM=HS256
//! JWT_ISSUER=auth.example.com
//! AUTH_SKIP_PATHS=/health,/metrics
//! SERVER_ADDR=0.0.0.0:3000
//! ```

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;

pub use middleware::identity::{IdentityClaims, IdentityToken};
pub use middleware::jwt::{AuthGate, AuthGateLayer, AuthGateService, Outcome};
pub use middleware::request::GateRequest;
pub use utils::errors::GateError;

// Re-export workspace crates for convenience
pub use bearergate_auth;
pub use bearergate_config;
