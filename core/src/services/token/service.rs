//! Main token service implementation

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{expiry, Claims};
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::TokenServiceConfig;

/// Issues and verifies HS256 auth tokens signed with a shared secret
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or an internal error if the secret is empty or
    /// the token lifetime does not yield a representable expiry
    pub fn new(config: TokenServiceConfig) -> DomainResult<Self> {
        if config.jwt_secret.is_empty() {
            return Err(DomainError::internal("JWT signing secret must not be empty"));
        }
        if let Some(ttl) = config.token_ttl_seconds {
            expiry(Utc::now(), ttl).map_err(|_| {
                DomainError::internal(format!("JWT token lifetime of {}s is out of range", ttl))
            })?;
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        if config.token_ttl_seconds.is_some() {
            validation.set_required_spec_claims(&["sub", "exp"]);
            validation.validate_exp = true;
        } else {
            validation.set_required_spec_claims(&["sub"]);
            validation.validate_exp = false;
        }

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Signs a token whose subject is `user_id`
    pub fn issue(&self, user_id: Uuid) -> DomainResult<String> {
        let claims = Claims::new(user_id, Utc::now(), self.config.token_ttl_seconds)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign auth token: {}", e);
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Verifies a token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if the signature and expiry check out
    /// * `Err(DomainError::Token)` - Token is invalid, expired, or malformed
    pub fn verify(&self, token: &str) -> DomainResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let error = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim {
                        claim: claim.clone(),
                    },
                    _ => TokenError::InvalidTokenFormat,
                };
                DomainError::Token(error)
            })
    }

    /// Token lifetime in seconds, if tokens expire at all
    pub fn token_ttl_seconds(&self) -> Option<i64> {
        self.config.token_ttl_seconds
    }
}
