use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::KeyMaterial;

/// Claims we read from identity-provider tokens. `sub` is the owner id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid key material: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("token has an empty subject")]
    EmptySubject,
}

/// Verifies bearer/session tokens issued by the external identity provider.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(
        key: &KeyMaterial,
        issuer: Option<&str>,
        audience: Option<&str>,
    ) -> Result<Self, AuthError> {
        let (key, algorithm) = match key {
            KeyMaterial::Hs256Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            KeyMaterial::Rs256PublicKey(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(AuthError::InvalidKey)?,
                Algorithm::RS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(TokenVerifier { key, validation })
    }

    /// Returns the owner id carried by `token`.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data =
            decode::<Claims>(token, &self.key, &self.validation).map_err(AuthError::InvalidToken)?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::EmptySubject);
        }
        Ok(data.claims.sub)
    }
}
