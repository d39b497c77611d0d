//! Authentication configuration: token signing

use serde::{Deserialize, Serialize};

const DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared HS256 secret used to sign and verify auth tokens
    pub secret: String,

    /// Token lifetime in seconds; `None` issues tokens without an `exp` claim
    #[serde(default)]
    pub token_ttl_seconds: Option<i64>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEVELOPMENT_SECRET),
            token_ttl_seconds: None,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Issue tokens that expire after the given number of seconds
    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = Some(seconds);
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from `JWT_PRIVATE_KEY` and `JWT_TOKEN_TTL_SECONDS`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_PRIVATE_KEY").unwrap_or_else(|| DEVELOPMENT_SECRET.to_string());
        let token_ttl_seconds = lookup("JWT_TOKEN_TTL_SECONDS").and_then(|v| v.trim().parse().ok());
        let config = Self {
            jwt: JwtConfig {
                secret,
                token_ttl_seconds,
            },
        };

        if config.jwt.is_using_default_secret() {
            tracing::warn!("JWT_PRIVATE_KEY is not set; falling back to the development secret");
        }

        config
    }

    /// Get JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt.secret
    }
}
