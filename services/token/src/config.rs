//! Declarative token configuration.
//!
//! A [`TokenConfig`] describes a whole token in one value: either a JSON
//! object (reserved keys for signing and time settings, every other key a
//! claim) or a set of `JWT_*` environment variables.

use crate::error::TokenError;
use crate::jwt::{Clock, TokenBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How `iat` / `nbf` should be set.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimeSetting {
    /// `true` sets the claim relative to now, `false` leaves it unset.
    Enabled(bool),
    /// Offset or absolute time, resolved like `TokenBuilder::set_issued_at`.
    At(f64),
}

impl FromStr for TimeSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "true" => Ok(Self::Enabled(true)),
            "false" => Ok(Self::Enabled(false)),
            other => other
                .parse::<f64>()
                .map(Self::At)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Token configuration.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    /// Algorithm name, HS256 when absent
    pub algorithm: Option<String>,
    /// HMAC secret
    pub secret: Option<String>,
    /// PEM encoded RSA private key
    pub private_key: Option<String>,
    /// Path to a PEM encoded RSA private key
    pub private_key_file: Option<PathBuf>,
    /// Issued-at setting
    pub iat: Option<TimeSetting>,
    /// Not-before setting
    pub nbf: Option<TimeSetting>,
    /// Expiry in seconds after issued-at (or now)
    pub exp: Option<f64>,
    /// Extra header fields
    pub headers: Option<Map<String, Value>>,
    /// Everything else
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl TokenConfig {
    /// Parse a configuration from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the value is not a valid config object.
    pub fn from_json(value: Value) -> Result<Self, TokenError> {
        serde_json::from_value(value).map_err(|e| TokenError::config(format!("Invalid token config: {e}")))
    }

    /// Load configuration from environment variables (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_env() -> Result<Self, TokenError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TokenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let headers = lookup("JWT_KEY_ID").map(|kid| {
            let mut headers = Map::new();
            headers.insert("kid".to_string(), Value::from(kid));
            headers
        });

        let claims = match lookup("JWT_CLAIMS") {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(_) => return Err(TokenError::config("Invalid JWT_CLAIMS: expected a JSON object")),
                Err(e) => return Err(TokenError::config(format!("Invalid JWT_CLAIMS: {e}"))),
            },
            None => Map::new(),
        };

        Ok(Self {
            algorithm: lookup("JWT_ALGORITHM"),
            secret: lookup("JWT_SECRET"),
            private_key: lookup("JWT_PRIVATE_KEY"),
            private_key_file: lookup("JWT_PRIVATE_KEY_FILE").map(PathBuf::from),
            iat: parse_var(&lookup, "JWT_ISSUED_AT")?,
            nbf: parse_var(&lookup, "JWT_NOT_BEFORE")?,
            exp: parse_var(&lookup, "JWT_EXPIRY")?,
            headers,
            claims,
        })
    }

    /// Apply this configuration to `builder`.
    ///
    /// Issued-at is applied before expiry so a configured `exp` is relative
    /// to the configured `iat`.
    ///
    /// # Errors
    ///
    /// Unknown algorithm names and key file read failures.
    pub fn apply<C: Clock>(&self, builder: &mut TokenBuilder<C>) -> Result<(), TokenError> {
        if let Some(algorithm) = &self.algorithm {
            builder.set_algorithm(algorithm)?;
        }
        if let Some(secret) = &self.secret {
            builder.set_secret(secret);
        }
        if let Some(key) = &self.private_key {
            builder.set_private_key(key);
        }
        if let Some(path) = &self.private_key_file {
            builder.set_private_key_from_file(path)?;
        }

        match self.iat {
            Some(TimeSetting::Enabled(true)) => {
                builder.set_issued_at(0);
            }
            Some(TimeSetting::At(value)) => {
                builder.set_issued_at(value);
            }
            Some(TimeSetting::Enabled(false)) | None => {}
        }
        match self.nbf {
            Some(TimeSetting::Enabled(true)) => {
                builder.set_not_before(0);
            }
            Some(TimeSetting::At(value)) => {
                builder.set_not_before(value);
            }
            Some(TimeSetting::Enabled(false)) | None => {}
        }
        if let Some(exp) = self.exp {
            builder.set_expiry(exp);
        }

        builder
            .set_headers(self.headers.clone())
            .set_claims(self.claims.clone());

        Ok(())
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("private_key_file", &self.private_key_file)
            .field("iat", &self.iat)
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("headers", &self.headers)
            .field("claims", &self.claims)
            .finish()
    }
}

impl TokenBuilder {
    /// Create a builder configured from `config`.
    ///
    /// # Errors
    ///
    /// See [`TokenConfig::apply`].
    pub fn from_config(config: &TokenConfig) -> Result<Self, TokenError> {
        let mut builder = Self::new();
        config.apply(&mut builder)?;
        Ok(builder)
    }
}

/// Parse an optional variable, naming it in the error.
fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, TokenError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|val| {
            val.trim()
                .parse()
                .map_err(|e| TokenError::config(format!("Invalid {name}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::{FixedClock, SigningAlgorithm, Timestamp};
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_time_setting_parsing() {
        assert_eq!("true".parse::<TimeSetting>().unwrap(), TimeSetting::Enabled(true));
        assert_eq!("false".parse::<TimeSetting>().unwrap(), TimeSetting::Enabled(false));
        assert_eq!("-30".parse::<TimeSetting>().unwrap(), TimeSetting::At(-30.0));
        assert!("soon".parse::<TimeSetting>().is_err());
    }

    #[test]
    fn test_from_json_splits_reserved_keys() {
        let config = TokenConfig::from_json(json!({
            "algorithm": "HS384",
            "secret": "super-secret",
            "iat": true,
            "nbf": false,
            "exp": 3600,
            "headers": { "kid": "2016-11-17" },
            "iss": "https://auth.vandium.io"
        }))
        .unwrap();

        assert_eq!(config.algorithm.as_deref(), Some("HS384"));
        assert_eq!(config.iat, Some(TimeSetting::Enabled(true)));
        assert_eq!(config.nbf, Some(TimeSetting::Enabled(false)));
        assert_eq!(config.exp, Some(3600.0));
        assert_eq!(config.headers.unwrap()["kid"], "2016-11-17");
        assert_eq!(config.claims.len(), 1);
        assert_eq!(config.claims["iss"], "https://auth.vandium.io");
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        let result = TokenConfig::from_json(json!({ "exp": "an hour" }));
        assert!(matches!(result, Err(TokenError::Config(_))));
    }

    #[test]
    fn test_apply_time_settings() {
        let config = TokenConfig::from_json(json!({
            "iat": true,
            "nbf": -60,
            "exp": 3600
        }))
        .unwrap();

        let mut builder = TokenBuilder::with_clock(FixedClock::new(1_000_000.0));
        config.apply(&mut builder).unwrap();

        assert_eq!(builder.issued_at(), Some(Timestamp::relative(1_000_000)));
        assert_eq!(builder.not_before(), Some(Timestamp::relative(999_940)));
        assert_eq!(builder.expiry().map(|t| t.value), Some(1_003_600));
    }

    #[test]
    fn test_apply_disabled_time_settings() {
        let config = TokenConfig::from_json(json!({ "iat": false, "nbf": false })).unwrap();

        let mut builder = TokenBuilder::with_clock(FixedClock::new(1_000_000.0));
        config.apply(&mut builder).unwrap();

        assert!(builder.issued_at().is_none());
        assert!(builder.not_before().is_none());
    }

    #[test]
    fn test_apply_unknown_algorithm() {
        let config = TokenConfig::from_json(json!({ "algorithm": "HS1024" })).unwrap();
        let err = TokenBuilder::from_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "unknown algorithm: HS1024");
    }

    #[test]
    fn test_apply_rs256_with_inline_key() {
        let config = TokenConfig::from_json(json!({
            "algorithm": "RS256",
            "privateKey": "pem-contents"
        }))
        .unwrap();

        let builder = TokenBuilder::from_config(&config).unwrap();

        assert_eq!(builder.algorithm(), SigningAlgorithm::RS256);
        assert!(builder.has_private_key());
        assert!(!builder.has_secret());
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = TokenConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TokenConfig::default());
    }

    #[test]
    fn test_from_lookup_values() {
        let config = TokenConfig::from_lookup(lookup(&[
            ("JWT_ALGORITHM", "HS512"),
            ("JWT_SECRET", "super-secret"),
            ("JWT_ISSUED_AT", "true"),
            ("JWT_EXPIRY", "900"),
            ("JWT_KEY_ID", "key-1"),
            ("JWT_CLAIMS", r#"{"sub":"user-123"}"#),
        ]))
        .unwrap();

        assert_eq!(config.algorithm.as_deref(), Some("HS512"));
        assert_eq!(config.secret.as_deref(), Some("super-secret"));
        assert_eq!(config.iat, Some(TimeSetting::Enabled(true)));
        assert_eq!(config.exp, Some(900.0));
        assert_eq!(config.headers.unwrap()["kid"], "key-1");
        assert_eq!(config.claims["sub"], "user-123");
    }

    #[test]
    fn test_from_lookup_invalid_expiry() {
        let err = TokenConfig::from_lookup(lookup(&[("JWT_EXPIRY", "later")])).unwrap_err();
        assert!(err.to_string().contains("JWT_EXPIRY"));
    }

    #[test]
    fn test_from_lookup_claims_must_be_object() {
        let err = TokenConfig::from_lookup(lookup(&[("JWT_CLAIMS", "[1,2]")])).unwrap_err();
        assert!(err.to_string().contains("JWT_CLAIMS"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = TokenConfig {
            secret: Some("super-secret".to_string()),
            ..TokenConfig::default()
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
