use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::users::application::ports::outgoing::token_provider::{
    CallerClaims, TokenError, TokenProvider,
};

use super::jwt_config::JwtConfig;

/// Wire shape of the tokens the auth service issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JwtClaims {
    sub: Uuid,
    exp: i64,
    iat: i64,
    nbf: i64,
    token_type: String,
    role: String,
}

#[derive(Clone)]
pub struct JwtTokenProvider {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for JwtTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenProvider")
            .field("config", &"JwtConfig")
            .finish()
    }
}

impl JwtTokenProvider {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        Self {
            config,
            decoding_key,
        }
    }
}

impl TokenProvider for JwtTokenProvider {
    fn verify_token(&self, token: &str) -> Result<CallerClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.config.leeway_seconds;
        validation.validate_nbf = true;

        let decoded = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;

            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token verification failed: Token expired");
                    TokenError::TokenExpired
                }
                ErrorKind::InvalidSignature => {
                    tracing::error!("Security alert: Invalid token signature detected");
                    TokenError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token verification failed: Malformed token");
                    TokenError::InvalidToken
                }
            }
        })?;

        let claims = decoded.claims;

        // Only access tokens reach this service; anything else is rejected.
        if claims.token_type != "access" {
            tracing::warn!(
                "Token type mismatch: expected 'access', got '{}'",
                claims.token_type
            );
            return Err(TokenError::InvalidToken);
        }

        Ok(CallerClaims {
            sub: claims.sub,
            role: claims.role,
            token_type: claims.token_type,
        })
    }
}
