//! JWT issuance
//!
//! Tokens are HMAC-signed and carry the person's CPF as subject plus their
//! name. The same [`JwtConfig`] feeds the validating middleware.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::config::{JwtConfig, MIN_JWT_SECRET_BYTES};
use crate::error::Error;
use crate::models::Person;

/// Claims written to and read from tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the person's CPF
    pub sub: String,
    pub cpf: String,
    pub nome: String,
    pub iss: String,
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token ID
    pub jti: String,
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs tokens for authenticated persons
#[derive(Clone)]
pub struct JwtIssuer {
    encoding_key: Arc<EncodingKey>,
    algorithm: Algorithm,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl JwtIssuer {
    pub fn new(config: &JwtConfig) -> Result<Self, Error> {
        let algorithm = parse_algorithm(&config.algorithm)?;
        check_secret(&config.secret)?;
        let lifetime = Duration::try_seconds(config.lifetime_secs)
            .filter(|lifetime| *lifetime > Duration::zero())
            .ok_or_else(|| {
                Error::Config(Box::new(figment::Error::from(format!(
                    "Invalid token lifetime: {} seconds",
                    config.lifetime_secs
                ))))
            })?;

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(config.secret.as_bytes())),
            algorithm,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime,
        })
    }

    /// Issue a token for `person`, valid from now for the configured lifetime
    pub fn issue(&self, person: &Person) -> Result<IssuedToken, Error> {
        self.issue_at(person, Utc::now())
    }

    pub(crate) fn issue_at(&self, person: &Person, now: DateTime<Utc>) -> Result<IssuedToken, Error> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| Error::Internal("Token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: person.cpf.clone(),
            cpf: person.cpf.clone(),
            nome: person.name.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;

        Ok(IssuedToken { token, expires_at })
    }
}

/// HMAC algorithms only; the key is a shared secret
pub(crate) fn parse_algorithm(alg: &str) -> Result<Algorithm, Error> {
    match alg.to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(Error::Config(Box::new(figment::Error::from(format!(
            "Unsupported JWT algorithm: {} (expected HS256, HS384 or HS512)",
            alg
        ))))),
    }
}

pub(crate) fn check_secret(secret: &str) -> Result<(), Error> {
    if secret.len() < MIN_JWT_SECRET_BYTES {
        return Err(Error::Config(Box::new(figment::Error::from(format!(
            "JWT secret must be at least {} bytes",
            MIN_JWT_SECRET_BYTES
        )))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    fn config() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            ..Default::default()
        }
    }

    fn person() -> Person {
        Person {
            cpf: "12345678901".to_string(),
            name: "Ana".to_string(),
            birth_date: None,
            postal_code: None,
            plate: None,
            password_hash: None,
        }
    }

    #[test]
    fn test_issue_round_trips_claims() {
        let issuer = JwtIssuer::new(&config()).unwrap();
        let issued = issuer.issue(&person()).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["MottuApi"]);
        validation.set_audience(&["MottuMobile"]);
        let data = decode::<Claims>(
            &issued.token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims.sub, "12345678901");
        assert_eq!(data.claims.cpf, "12345678901");
        assert_eq!(data.claims.nome, "Ana");
        assert_eq!(data.claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_expiry_is_eight_hours() {
        let issuer = JwtIssuer::new(&config()).unwrap();
        let now = Utc::now();
        let issued = issuer.issue_at(&person(), now).unwrap();
        assert_eq!(issued.expires_at - now, Duration::hours(8));
    }

    #[test]
    fn test_unique_token_ids() {
        let issuer = JwtIssuer::new(&config()).unwrap();
        let a = issuer.issue(&person()).unwrap();
        let b = issuer.issue(&person()).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_rejects_short_secret_and_asymmetric_algorithms() {
        let mut short = config();
        short.secret = "short".to_string();
        assert!(matches!(JwtIssuer::new(&short), Err(Error::Config(_))));

        let mut rsa = config();
        rsa.algorithm = "RS256".to_string();
        assert!(matches!(JwtIssuer::new(&rsa), Err(Error::Config(_))));

        let mut lower = config();
        lower.algorithm = "hs512".to_string();
        assert!(JwtIssuer::new(&lower).is_ok());
    }
}
