//! Claims carried by signed auth tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp, absent for non-expiring tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Creates claims for `user_id` issued at `now`, expiring after `ttl_seconds` if given.
    ///
    /// Fails with [`TokenError::TokenGenerationFailed`] when the expiry is not a
    /// representable instant.
    pub fn new(
        user_id: Uuid,
        now: DateTime<Utc>,
        ttl_seconds: Option<i64>,
    ) -> Result<Self, TokenError> {
        let exp = match ttl_seconds {
            Some(ttl) => Some(expiry(now, ttl)?.timestamp()),
            None => None,
        };

        Ok(Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp,
        })
    }

    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::InvalidTokenFormat)
    }
}

/// `now + ttl_seconds`, if chrono can represent it
pub fn expiry(now: DateTime<Utc>, ttl_seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(TokenError::TokenGenerationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_without_ttl_omit_exp() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, Utc::now(), None).unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], id.to_string());
        assert!(json.get("exp").is_none());
        assert_eq!(claims.user_id().unwrap(), id);
    }

    #[test]
    fn test_claims_with_ttl() {
        let now = Utc::now();
        let claims = Claims::new(Uuid::new_v4(), now, Some(900)).unwrap();
        assert_eq!(claims.exp, Some(now.timestamp() + 900));
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error() {
        let now = Utc::now();

        for ttl in [i64::MAX, i64::MIN, i64::MAX / 1000] {
            assert_eq!(
                Claims::new(Uuid::new_v4(), now, Some(ttl)),
                Err(TokenError::TokenGenerationFailed)
            );
        }
    }

    #[test]
    fn test_invalid_subject() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            iat: 0,
            exp: None,
        };
        assert_eq!(claims.user_id(), Err(TokenError::InvalidTokenFormat));
    }
}
