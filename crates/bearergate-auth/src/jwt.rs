//! JWT verification.
//!
//! A [`Verifier`] bundles the accepted signing algorithm, a [`KeyResolver`]
//! and the claims strategy. The strategy is chosen once, by the constructor:
//!
//! - [`Verifier::untyped`] decodes the payload into [`GenericClaims`]
//! - [`Verifier::typed`] decodes into a caller type and then runs its
//!   [`ValidateClaims::validate`] hook
//!
//! Registered time claims (`exp`, `nbf`) are checked by `jsonwebtoken` in
//! both strategies, with a default leeway of 60 seconds. The same leeway is
//! handed to [`ValidateClaims::validate`].
//!
//! # Example
//!
//! ```ignore
//! use bearergate_auth::{StaticKey, Verifier};
//! use jsonwebtoken::Algorithm;
//!
//! let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(b"secret"))
//!     .with_issuer(&["auth.example.com"]);
//!
//! let verified = verifier.verify(&token)?;
//! println!("sub = {:?}", verified.claims.get("sub"));
//! ```

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, Header, Validation, decode, decode_header};
use serde::de::DeserializeOwned;

use crate::claims::{GenericClaims, ValidateClaims};
use crate::errors::{ClaimsError, VerificationError};
use crate::keys::{KeyResolver, UnverifiedToken};

/// How the claims payload is treated after the signature checks out.
pub enum ClaimsMode<C> {
    /// Keep the payload as decoded.
    Untyped,
    /// Run the claims type's self-validation.
    Typed(fn(&C, u64) -> Result<(), ClaimsError>),
}

impl<C> Clone for ClaimsMode<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ClaimsMode<C> {}

impl<C> fmt::Debug for ClaimsMode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimsMode::Untyped => f.write_str("Untyped"),
            ClaimsMode::Typed(_) => f.write_str("Typed"),
        }
    }
}

/// A token that passed verification.
#[derive(Debug, Clone)]
pub struct VerifiedToken<C> {
    /// The compact serialization the client sent.
    pub raw: String,
    pub header: Header,
    pub claims: C,
}

pub struct Verifier<C> {
    algorithm: Algorithm,
    validation: Validation,
    resolver: Arc<dyn KeyResolver>,
    mode: ClaimsMode<C>,
}

impl Verifier<GenericClaims> {
    /// Verifier producing the untyped claim set.
    pub fn untyped(algorithm: Algorithm, resolver: impl KeyResolver + 'static) -> Self {
        Self::with_mode(algorithm, Arc::new(resolver), ClaimsMode::Untyped)
    }
}

impl<C: ValidateClaims> Verifier<C> {
    /// Verifier decoding into `C` and running `C::validate` on success.
    pub fn typed(algorithm: Algorithm, resolver: impl KeyResolver + 'static) -> Self {
        Self::with_mode(algorithm, Arc::new(resolver), ClaimsMode::Typed(C::validate))
    }
}

impl<C> Verifier<C> {
    fn with_mode(algorithm: Algorithm, resolver: Arc<dyn KeyResolver>, mode: ClaimsMode<C>) -> Self {
        let mut validation = Validation::new(algorithm);
        // `exp` is checked when present, not demanded
        validation.required_spec_claims.clear();
        validation.validate_nbf = true;
        // audience is opt-in, see `with_audience`
        validation.validate_aud = false;

        Self {
            algorithm,
            validation,
            resolver,
            mode,
        }
    }

    /// Only accept tokens whose `iss` is one of `issuers`.
    pub fn with_issuer<T: ToString>(mut self, issuers: &[T]) -> Self {
        self.validation.set_issuer(issuers);
        self
    }

    /// Only accept tokens whose `aud` contains one of `audiences`.
    pub fn with_audience<T: ToString>(mut self, audiences: &[T]) -> Self {
        self.validation.set_audience(audiences);
        self.validation.validate_aud = true;
        self
    }

    /// Clock skew tolerated on `exp` and `nbf`, in seconds.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.validation.leeway = seconds;
        self
    }

    /// Registered claims that must be present (e.g. `["exp", "sub"]`).
    pub fn with_required_claims<T: ToString>(mut self, claims: &[T]) -> Self {
        self.validation.set_required_spec_claims(claims);
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn mode(&self) -> ClaimsMode<C> {
        self.mode
    }
}

impl<C: DeserializeOwned> Verifier<C> {
    /// Parses `token`, resolves its key, checks signature and registered
    /// claims, and for the typed strategy runs the claims' self-validation.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken<C>, VerificationError> {
        let header = decode_header(token)?;
        let key = self
            .resolver
            .resolve(&UnverifiedToken::new(token, &header))?;

        let data = decode::<C>(token, &key, &self.validation)?;

        if let ClaimsMode::Typed(validate) = self.mode {
            validate(&data.claims, self.validation.leeway)?;
        }

        Ok(VerifiedToken {
            raw: token.to_string(),
            header: data.header,
            claims: data.claims,
        })
    }
}

impl<C> Clone for Verifier<C> {
    fn clone(&self) -> Self {
        Self {
            algorithm: self.algorithm,
            validation: self.validation.clone(),
            resolver: Arc::clone(&self.resolver),
            mode: self.mode,
        }
    }
}

impl<C> fmt::Debug for Verifier<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("algorithm", &self.algorithm)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::RegisteredClaims;
    use crate::errors::KeyResolutionError;
    use crate::keys::{KeySet, StaticKey, key_fn};
    use chrono::Utc;
    use jsonwebtoken::errors::ErrorKind;
    use jsonwebtoken::{DecodingKey, EncodingKey, encode};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-characters-long";

    fn sign(claims: &serde_json::Value, alg: Algorithm, secret: &[u8]) -> String {
        encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn now() -> i64 {
        Utc::now().timestamp()
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct ScopedClaims {
        sub: String,
        scope: String,
        exp: i64,
    }

    impl ValidateClaims for ScopedClaims {
        fn validate(&self, _leeway: u64) -> Result<(), ClaimsError> {
            if self.scope != "api" {
                return Err(ClaimsError::Invalid(format!("unexpected scope {}", self.scope)));
            }
            Ok(())
        }
    }

    #[test]
    fn test_untyped_verify_success() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(
            &json!({"sub": "user-1", "exp": now() + 3600}),
            Algorithm::HS256,
            SECRET,
        );

        let verified = verifier.verify(&token).unwrap();
        assert_eq!(verified.raw, token);
        assert_eq!(verified.header.alg, Algorithm::HS256);
        assert_eq!(verified.claims.get("sub"), Some(&json!("user-1")));
    }

    #[test]
    fn test_untyped_verify_without_exp() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(&json!({"sub": "user-1"}), Algorithm::HS256, SECRET);
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn test_required_claims() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET))
            .with_required_claims(&["exp"]);
        let token = sign(&json!({"sub": "user-1"}), Algorithm::HS256, SECRET);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_wrong_secret() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(
            &json!({"sub": "user-1"}),
            Algorithm::HS256,
            b"different-secret-key-at-least-32-characters",
        );

        match verifier.verify(&token) {
            Err(VerificationError::Token(err)) => {
                assert!(matches!(err.kind(), ErrorKind::InvalidSignature))
            }
            other => panic!("expected signature failure, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_algorithm_mismatch() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(&json!({"sub": "user-1"}), Algorithm::HS384, SECRET);

        match verifier.verify(&token) {
            Err(VerificationError::Token(err)) => {
                assert!(matches!(err.kind(), ErrorKind::InvalidAlgorithm))
            }
            other => panic!("expected algorithm failure, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_malformed_token() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET));
        assert!(matches!(
            verifier.verify("abc.def.ghi"),
            Err(VerificationError::Token(_))
        ));
        assert!(matches!(
            verifier.verify("not-a-jwt"),
            Err(VerificationError::Token(_))
        ));
    }

    #[test]
    fn test_untyped_rejects_expired() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(
            &json!({"sub": "user-1", "exp": now() - 3600}),
            Algorithm::HS256,
            SECRET,
        );

        match verifier.verify(&token) {
            Err(VerificationError::Token(err)) => {
                assert!(matches!(err.kind(), ErrorKind::ExpiredSignature))
            }
            other => panic!("expected expiry failure, got {other:?}"),
        }
    }

    #[test]
    fn test_leeway_admits_recently_expired() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET))
            .with_leeway(120);
        let token = sign(
            &json!({"sub": "user-1", "exp": now() - 30}),
            Algorithm::HS256,
            SECRET,
        );
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn test_issuer_mismatch() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET))
            .with_issuer(&["auth.example.com"]);
        let token = sign(
            &json!({"sub": "user-1", "iss": "evil.example.com"}),
            Algorithm::HS256,
            SECRET,
        );
        assert!(verifier.verify(&token).is_err());

        let token = sign(
            &json!({"sub": "user-1", "iss": "auth.example.com"}),
            Algorithm::HS256,
            SECRET,
        );
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn test_audience_only_checked_when_configured() {
        let token = sign(
            &json!({"sub": "user-1", "aud": "billing"}),
            Algorithm::HS256,
            SECRET,
        );

        let open = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET));
        assert!(open.verify(&token).is_ok());

        let strict = open.clone().with_audience(&["api"]);
        assert!(strict.verify(&token).is_err());
    }

    #[test]
    fn test_typed_verify_success() {
        let verifier =
            Verifier::<ScopedClaims>::typed(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(
            &json!({"sub": "user-2", "scope": "api", "exp": now() + 60}),
            Algorithm::HS256,
            SECRET,
        );

        let verified = verifier.verify(&token).unwrap();
        assert_eq!(verified.claims.sub, "user-2");
        assert!(matches!(verifier.mode(), ClaimsMode::Typed(_)));
    }

    #[test]
    fn test_typed_self_validation_failure() {
        let verifier =
            Verifier::<ScopedClaims>::typed(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(
            &json!({"sub": "user-2", "scope": "admin", "exp": now() + 60}),
            Algorithm::HS256,
            SECRET,
        );

        assert!(matches!(
            verifier.verify(&token),
            Err(VerificationError::Claims(ClaimsError::Invalid(_)))
        ));
    }

    #[test]
    fn test_typed_missing_field_is_token_error() {
        let verifier =
            Verifier::<ScopedClaims>::typed(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(&json!({"sub": "user-2"}), Algorithm::HS256, SECRET);
        assert!(matches!(
            verifier.verify(&token),
            Err(VerificationError::Token(_))
        ));
    }

    #[test]
    fn test_typed_registered_claims_issued_in_future() {
        let verifier =
            Verifier::<RegisteredClaims>::typed(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(
            &json!({"sub": "user-3", "iat": now() + 3600}),
            Algorithm::HS256,
            SECRET,
        );
        assert!(matches!(
            verifier.verify(&token),
            Err(VerificationError::Claims(ClaimsError::IssuedInFuture))
        ));
    }

    #[test]
    fn test_typed_registered_claims_share_leeway() {
        let token = sign(
            &json!({"sub": "user-3", "exp": now() - 10}),
            Algorithm::HS256,
            SECRET,
        );

        let lenient =
            Verifier::<RegisteredClaims>::typed(Algorithm::HS256, StaticKey::from_secret(SECRET));
        assert!(lenient.verify(&token).is_ok());

        let strict = lenient.clone().with_leeway(0);
        assert!(strict.verify(&token).is_err());
    }

    #[test]
    fn test_key_set_by_kid() {
        let verifier = Verifier::untyped(
            Algorithm::HS256,
            KeySet::new()
                .with_key("old", DecodingKey::from_secret(b"old-secret"))
                .with_key("new", DecodingKey::from_secret(b"new-secret")),
        );

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("new".to_string());
        let token = encode(
            &header,
            &json!({"sub": "user-4"}),
            &EncodingKey::from_secret(b"new-secret"),
        )
        .unwrap();
        let verified = verifier.verify(&token).unwrap();
        assert_eq!(verified.header.kid.as_deref(), Some("new"));

        header.kid = Some("retired".to_string());
        let token = encode(
            &header,
            &json!({"sub": "user-4"}),
            &EncodingKey::from_secret(b"new-secret"),
        )
        .unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(VerificationError::KeyResolution(KeyResolutionError::UnknownKeyId(_)))
        ));
    }

    #[test]
    fn test_closure_resolver_failure_propagates() {
        let verifier = Verifier::untyped(
            Algorithm::HS256,
            key_fn(|_| Err(KeyResolutionError::Other("key store offline".to_string()))),
        );
        let token = sign(&json!({"sub": "user-5"}), Algorithm::HS256, SECRET);

        let err = verifier.verify(&token).unwrap_err();
        assert_eq!(
            err.to_string(),
            "key resolution failed: key store offline"
        );
    }

    #[test]
    fn test_verifier_is_reusable() {
        let verifier = Verifier::untyped(Algorithm::HS256, StaticKey::from_secret(SECRET));
        let token = sign(&json!({"sub": "user-6"}), Algorithm::HS256, SECRET);

        let first = verifier.verify(&token).unwrap();
        let second = verifier.verify(&token).unwrap();
        assert_eq!(first.claims, second.claims);
        assert_eq!(verifier.algorithm(), Algorithm::HS256);
    }
}
