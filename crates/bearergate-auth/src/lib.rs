//! # bearergate auth
//!
//! Token verification for the bearergate middleware. Nothing in here knows
//! about HTTP; the middleware crate feeds it token strings.
//!
//! - [`claims`]: untyped and typed claim sets, plus the self-validation trait
//! - [`keys`]: key resolution (static key, `kid` lookup, closures)
//! - [`jwt`]: the [`Verifier`] and its two claims strategies
//! - [`errors`]: verification error types
//!
//! # Example
//!
//! ```ignore
//! use bearergate_auth::{RegisteredClaims, StaticKey, Verifier};
//! use jsonwebtoken::Algorithm;
//!
//! let verifier = Verifier::<RegisteredClaims>::typed(
//!     Algorithm::HS256,
//!     StaticKey::from_secret(b"secret"),
//! );
//!
//! let verified = verifier.verify(&token)?;
//! println!("subject: {:?}", verified.claims.sub);
//! ```

pub mod claims;
pub mod errors;
pub mod jwt;
pub mod keys;

// Re-export commonly used types at crate root
pub use claims::{Audience, ClaimsExt, GenericClaims, RegisteredClaims, ValidateClaims};
pub use errors::{ClaimsError, KeyResolutionError, VerificationError};
pub use jwt::{ClaimsMode, VerifiedToken, Verifier};
pub use keys::{KeyResolver, KeySet, StaticKey, UnverifiedToken, key_fn};

pub use jsonwebtoken::{Algorithm, DecodingKey, Header};
