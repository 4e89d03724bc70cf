//! Errors raised while configuring or building a token.

use thiserror::Error;

/// Token builder error.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Algorithm name outside HS256, HS384, HS512 and RS256
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// HMAC algorithm selected without a secret
    #[error("missing secret")]
    MissingSecret,

    /// RS256 selected without a private key
    #[error("missing private key")]
    MissingPrivateKey,

    /// Header field the codec cannot carry
    #[error("unsupported header: {0}")]
    UnsupportedHeader(String),

    /// Header field with a value of the wrong type
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Malformed token configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key file read failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure reported by `jsonwebtoken`
    #[error(transparent)]
    Codec(#[from] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors raised while checking builder state before encoding.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingSecret | Self::MissingPrivateKey)
    }
}
