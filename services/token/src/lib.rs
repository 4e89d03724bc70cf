//! Fluent builder for issuing signed JWTs.
//!
//! Collects claims, header fields, an algorithm and key material, resolves
//! relative `iat` / `nbf` / `exp` values against a clock and hands the result
//! to `jsonwebtoken` for signing.
//!
//! ```
//! use jwt_token_builder::TokenBuilder;
//! use serde_json::json;
//!
//! let token = TokenBuilder::new()
//!     .set_algorithm("HS256")?
//!     .set_secret("super-secret")
//!     .set_claims(json!({ "user": "test" }).as_object().cloned())
//!     .set_issued_at(0)
//!     .set_expiry(3600)
//!     .build()?;
//!
//! assert_eq!(token.split('.').count(), 3);
//! # Ok::<(), jwt_token_builder::TokenError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod jwt;
pub mod telemetry;

// Re-exports for convenience
pub use config::{TimeSetting, TokenConfig};
pub use error::TokenError;
pub use jwt::{SigningAlgorithm, TimeValue, Timestamp, TokenBuilder};

/// Configure a builder from `config` and build the token in one step.
///
/// # Errors
///
/// Any configuration or build error.
pub fn issue(config: &TokenConfig) -> Result<String, TokenError> {
    TokenBuilder::from_config(config)?.build()
}
