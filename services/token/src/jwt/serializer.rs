//! Header construction and encoding through `jsonwebtoken`.

use crate::error::TokenError;
use crate::jwt::algorithm::SigningAlgorithm;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{Map, Value};

/// Header fields the codec can carry besides `alg`.
pub const SUPPORTED_HEADERS: [&str; 9] =
    ["typ", "cty", "jku", "jwk", "kid", "x5u", "x5c", "x5t", "x5t#S256"];

/// Encodes claims for one algorithm.
pub struct JwtSerializer {
    algorithm: SigningAlgorithm,
}

impl JwtSerializer {
    /// Create a serializer for `algorithm`.
    #[must_use]
    pub const fn new(algorithm: SigningAlgorithm) -> Self {
        JwtSerializer { algorithm }
    }

    /// Build the JOSE header. `alg` always comes from the serializer.
    ///
    /// # Errors
    ///
    /// Header names outside [`SUPPORTED_HEADERS`] or values of the wrong type.
    pub fn header(&self, extra: &Map<String, Value>) -> Result<Header, TokenError> {
        let mut fields = Map::new();
        fields.insert("typ".to_string(), Value::from("JWT"));

        for (name, value) in extra {
            if name == "alg" {
                continue;
            }
            if !SUPPORTED_HEADERS.contains(&name.as_str()) {
                return Err(TokenError::UnsupportedHeader(name.clone()));
            }
            fields.insert(name.clone(), value.clone());
        }

        fields.insert("alg".to_string(), Value::from(self.algorithm.as_str()));

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| TokenError::InvalidHeader(e.to_string()))
    }

    /// Key material is interpreted per algorithm: raw bytes for HMAC, PEM for RSA.
    ///
    /// # Errors
    ///
    /// Codec error when an RSA key is not valid PEM.
    pub fn encoding_key(&self, material: &[u8]) -> Result<EncodingKey, TokenError> {
        if self.algorithm.is_hmac() {
            Ok(EncodingKey::from_secret(material))
        } else {
            Ok(EncodingKey::from_rsa_pem(material)?)
        }
    }

    /// Encode `claims` signed with `material`.
    ///
    /// # Errors
    ///
    /// Header, key or encoding failures.
    pub fn serialize(
        &self,
        claims: &Map<String, Value>,
        material: &[u8],
        headers: &Map<String, Value>,
    ) -> Result<String, TokenError> {
        let header = self.header(headers)?;
        let key = self.encoding_key(material)?;

        Ok(encode(&header, claims, &key)?)
    }
}
