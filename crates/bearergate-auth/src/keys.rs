//! Key resolution for signature verification.
//!
//! The verifier decodes the token header first and asks a [`KeyResolver`] for
//! the key to check the signature against. Resolution failures surface as
//! verification failures.
//!
//! # Example
//!
//! ```ignore
//! use bearergate_auth::{KeySet, StaticKey, key_fn};
//! use jsonwebtoken::DecodingKey;
//!
//! // One shared secret for every token
//! let resolver = StaticKey::from_secret(b"secret");
//!
//! // Lookup by `kid`
//! let resolver = KeySet::new()
//!     .with_key("2024-01", DecodingKey::from_secret(b"old"))
//!     .with_key("2024-06", DecodingKey::from_secret(b"new"));
//!
//! // Anything else
//! let resolver = key_fn(|token| lookup(token.key_id()));
//! ```

use std::collections::HashMap;
use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Header};

use crate::errors::KeyResolutionError;

/// A token whose header has been decoded but whose signature has not been
/// checked yet.
#[derive(Debug, Clone, Copy)]
pub struct UnverifiedToken<'a> {
    raw: &'a str,
    header: &'a Header,
}

impl<'a> UnverifiedToken<'a> {
    pub fn new(raw: &'a str, header: &'a Header) -> Self {
        Self { raw, header }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn header(&self) -> &'a Header {
        self.header
    }

    pub fn key_id(&self) -> Option<&'a str> {
        self.header.kid.as_deref()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.header.alg
    }
}

/// Supplies the key used to verify a token's signature.
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, token: &UnverifiedToken<'_>) -> Result<DecodingKey, KeyResolutionError>;
}

impl<F> KeyResolver for F
where
    F: Fn(&UnverifiedToken<'_>) -> Result<DecodingKey, KeyResolutionError> + Send + Sync,
{
    fn resolve(&self, token: &UnverifiedToken<'_>) -> Result<DecodingKey, KeyResolutionError> {
        self(token)
    }
}

/// Pins a closure to the [`KeyResolver`] signature so its argument and
/// return types are inferred.
pub fn key_fn<F>(f: F) -> F
where
    F: Fn(&UnverifiedToken<'_>) -> Result<DecodingKey, KeyResolutionError> + Send + Sync,
{
    f
}

/// Resolves every token to the same key.
#[derive(Clone)]
pub struct StaticKey(DecodingKey);

impl StaticKey {
    pub fn new(key: DecodingKey) -> Self {
        Self(key)
    }

    /// HMAC secret shared by issuer and verifier.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self(DecodingKey::from_secret(secret))
    }
}

impl fmt::Debug for StaticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticKey(..)")
    }
}

impl KeyResolver for StaticKey {
    fn resolve(&self, _token: &UnverifiedToken<'_>) -> Result<DecodingKey, KeyResolutionError> {
        Ok(self.0.clone())
    }
}

/// Keys indexed by the `kid` header parameter.
#[derive(Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, DecodingKey>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, kid: impl Into<String>, key: DecodingKey) -> Self {
        self.insert(kid, key);
        self
    }

    pub fn insert(&mut self, kid: impl Into<String>, key: DecodingKey) {
        self.keys.insert(kid.into(), key);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("kids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeyResolver for KeySet {
    fn resolve(&self, token: &UnverifiedToken<'_>) -> Result<DecodingKey, KeyResolutionError> {
        let kid = token.key_id().ok_or(KeyResolutionError::MissingKeyId)?;
        self.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| KeyResolutionError::UnknownKeyId(kid.to_string()))
    }
}
