//! Configuration for the token service

use hb_shared::config::AuthConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret shared by every token holder that verifies
    pub jwt_secret: String,
    /// Token lifetime in seconds; `None` issues tokens without `exp`
    pub token_ttl_seconds: Option<i64>,
}

impl TokenServiceConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            token_ttl_seconds: None,
        }
    }

    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = Some(seconds);
        self
    }
}

impl From<&AuthConfig> for TokenServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt.secret.clone(),
            token_ttl_seconds: config.jwt.token_ttl_seconds,
        }
    }
}
