//! The fluent token builder.

use crate::error::TokenError;
use crate::jwt::algorithm::SigningAlgorithm;
use crate::jwt::claims::{self, TimeValue, Timestamp};
use crate::jwt::clock::{Clock, SystemClock};
use crate::jwt::serializer::JwtSerializer;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Fluent builder for a single signed JWT.
///
/// Setters mutate in place and return `&mut Self` so calls can be chained.
/// Only [`set_algorithm`](Self::set_algorithm) can fail at configuration
/// time; everything that depends on combined state is checked by
/// [`build`](Self::build).
///
/// `set_expiry` resolves against the issued-at value present *at call time*,
/// so set issued-at first when expiry should be relative to issuance.
pub struct TokenBuilder<C = SystemClock> {
    clock: C,
    algorithm: SigningAlgorithm,
    secret: Option<Zeroizing<Vec<u8>>>,
    private_key: Option<Zeroizing<Vec<u8>>>,
    claims: Map<String, Value>,
    headers: Map<String, Value>,
    issued_at: Option<Timestamp>,
    not_before: Option<Timestamp>,
    expiry: Option<Timestamp>,
}

impl TokenBuilder {
    /// Create a builder on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TokenBuilder<C> {
    /// Create a builder that resolves relative timestamps against `clock`.
    pub fn with_clock(clock: C) -> Self {
        TokenBuilder {
            clock,
            algorithm: SigningAlgorithm::default(),
            secret: None,
            private_key: None,
            claims: Map::new(),
            headers: Map::new(),
            issued_at: None,
            not_before: None,
            expiry: None,
        }
    }

    /// Replace all user claims. `None` clears them.
    pub fn set_claims(&mut self, claims: impl Into<Option<Map<String, Value>>>) -> &mut Self {
        self.claims = claims.into().unwrap_or_default();
        self
    }

    /// Replace all extra header fields. `None` clears them.
    pub fn set_headers(&mut self, headers: impl Into<Option<Map<String, Value>>>) -> &mut Self {
        self.headers = headers.into().unwrap_or_default();
        self
    }

    /// Select the signing algorithm by name.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownAlgorithm`] for anything other than
    /// HS256, HS384, HS512 or RS256. The current algorithm is kept.
    pub fn set_algorithm(&mut self, name: &str) -> Result<&mut Self, TokenError> {
        match name.parse() {
            Ok(alg) => Ok(self.set_signing_algorithm(alg)),
            Err(e) => {
                warn!(algorithm = %name, "Rejected signing algorithm");
                Err(e)
            }
        }
    }

    /// Select an already parsed algorithm.
    pub fn set_signing_algorithm(&mut self, algorithm: SigningAlgorithm) -> &mut Self {
        self.algorithm = algorithm;
        self
    }

    /// Shared secret for the HMAC algorithms. Not checked until build.
    pub fn set_secret(&mut self, secret: impl AsRef<[u8]>) -> &mut Self {
        self.secret = Some(Zeroizing::new(secret.as_ref().to_vec()));
        self
    }

    /// PEM encoded RSA private key for RS256. Not checked until build.
    pub fn set_private_key(&mut self, key: impl AsRef<[u8]>) -> &mut Self {
        self.private_key = Some(Zeroizing::new(key.as_ref().to_vec()));
        self
    }

    /// Read the whole file at `path` and use it as the private key.
    ///
    /// # Errors
    ///
    /// Propagates the read error unchanged; the builder is left untouched.
    pub fn set_private_key_from_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, TokenError> {
        let key = Zeroizing::new(std::fs::read(path.as_ref())?);
        debug!(path = %path.as_ref().display(), "Loaded private key from file");
        self.private_key = Some(key);
        Ok(self)
    }

    /// Set `iat`. `0` means now, a negative value means that many seconds ago,
    /// a positive value is taken as an absolute Unix time.
    pub fn set_issued_at(&mut self, value: impl TimeValue) -> &mut Self {
        self.issued_at = Some(claims::resolve_offset(value.into_seconds(), self.clock.now()));
        self
    }

    /// Set `nbf` with the same rules as [`set_issued_at`](Self::set_issued_at).
    pub fn set_not_before(&mut self, value: impl TimeValue) -> &mut Self {
        self.not_before = Some(claims::resolve_offset(value.into_seconds(), self.clock.now()));
        self
    }

    /// Set `exp` to `seconds` after the current issued-at, or after now when
    /// issued-at is unset. Not recomputed if issued-at changes later.
    pub fn set_expiry(&mut self, seconds: impl TimeValue) -> &mut Self {
        self.expiry = Some(claims::resolve_expiry(
            seconds.into_seconds(),
            self.issued_at,
            self.clock.now(),
        ));
        self
    }

    /// Current signing algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// User claims.
    #[must_use]
    pub const fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Extra header fields.
    #[must_use]
    pub const fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    /// Resolved `iat`, if set.
    #[must_use]
    pub const fn issued_at(&self) -> Option<Timestamp> {
        self.issued_at
    }

    /// Resolved `nbf`, if set.
    #[must_use]
    pub const fn not_before(&self) -> Option<Timestamp> {
        self.not_before
    }

    /// Resolved `exp`, if set.
    #[must_use]
    pub const fn expiry(&self) -> Option<Timestamp> {
        self.expiry
    }

    /// Whether a secret was given.
    #[must_use]
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Whether a private key was given.
    #[must_use]
    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    fn key_material(&self) -> Result<&[u8], TokenError> {
        let (material, missing) = if self.algorithm.is_hmac() {
            (self.secret.as_deref(), TokenError::MissingSecret)
        } else {
            (self.private_key.as_deref(), TokenError::MissingPrivateKey)
        };

        material
            .map(Vec::as_slice)
            .filter(|m| !m.is_empty())
            .ok_or(missing)
    }

    /// Validate the configuration and encode the signed token.
    ///
    /// # Errors
    ///
    /// [`TokenError::MissingSecret`] / [`TokenError::MissingPrivateKey`] when
    /// the credential required by the algorithm is absent, header errors for
    /// fields the codec cannot carry, and codec errors unchanged.
    pub fn build(&self) -> Result<String, TokenError> {
        let material = self.key_material()?;

        let claims = claims::assemble(self.issued_at, self.not_before, self.expiry, &self.claims);

        debug!(
            algorithm = %self.algorithm,
            claims = claims.len(),
            headers = self.headers.len(),
            "Encoding token"
        );

        JwtSerializer::new(self.algorithm).serialize(&claims, material, &self.headers)
    }
}

impl<C> fmt::Debug for TokenBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBuilder")
            .field("algorithm", &self.algorithm)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("claims", &self.claims)
            .field("headers", &self.headers)
            .field("issued_at", &self.issued_at)
            .field("not_before", &self.not_before)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
