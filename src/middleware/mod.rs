//! Authentication middleware.
//!
//! - [`jwt`]: the [`AuthGate`](jwt::AuthGate), its hooks, tower layer and axum adapter
//! - [`extract`]: token extraction strategies (`Authorization` header, `_jwt` form field)
//! - [`request`]: the request view handed to token extractors
//! - [`identity`]: identity data stored for downstream handlers and its extractors
//!
//! # Request Flow
//!
//! 1. Skip predicate matches → request forwarded untouched
//! 2. Token extracted from `Authorization: Bearer <token>` or `_jwt` → 400 when absent
//! 3. Token verified (signature, registered claims, typed self-validation) → 401 on failure
//! 4. Token and claims stored in the request extensions, request forwarded
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::identity::IdentityClaims;
//!
//! async fn me(IdentityClaims(claims): IdentityClaims<AccessClaims>) -> Json<AccessClaims> {
//!     Json(claims)
//! }
//! ```

pub mod extract;
pub mod identity;
pub mod jwt;
pub mod request;
