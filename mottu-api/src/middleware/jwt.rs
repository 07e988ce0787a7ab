//! Bearer token validation middleware

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::tokens::{check_secret, parse_algorithm, Claims};
use crate::{config::JwtConfig, error::Error};

/// JWT authentication middleware state
///
/// Validates signature, issuer, audience and expiry. On success the
/// decoded [`Claims`] are inserted into the request extensions.
#[derive(Clone)]
pub struct JwtAuth {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Result<Self, Error> {
        let algorithm = parse_algorithm(&config.algorithm)?;
        check_secret(&config.secret)?;

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Ok(Self {
            decoding_key: Arc::new(DecodingKey::from_secret(config.secret.as_bytes())),
            validation,
        })
    }

    /// Middleware function to validate JWT and inject claims
    pub async fn middleware(
        State(auth): State<Self>,
        mut request: Request<Body>,
        next: Next,
    ) -> Result<Response, Error> {
        let token = extract_token(request.headers())?;
        let claims = auth.validate_token(token)?;

        tracing::debug!(sub = %claims.sub, "Bearer token accepted");
        request.extensions_mut().insert(claims);

        Ok(next.run(request).await)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, Error> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| Error::Unauthorized(format!("Invalid token: {}", e)))
    }
}

/// Extract the token from an `Authorization: Bearer` header
pub fn extract_token(headers: &HeaderMap) -> Result<&str, Error> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Unauthorized("Missing Authorization header".to_string()))?;

    match auth_header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(Error::Unauthorized(
            "Invalid Authorization header format".to_string(),
        )),
    }
}
