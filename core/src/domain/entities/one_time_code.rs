//! Short-lived numeric codes for email/phone verification and password reset.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest code that can be issued
pub const CODE_MIN: u16 = 1000;

/// Largest code that can be issued
pub const CODE_MAX: u16 = 9999;

/// Lifetime of a freshly issued code (10 minutes)
pub const CODE_TTL_MINUTES: i64 = 10;

/// A four-digit one-time code and the instant it stops being accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeCode {
    /// The code sent to the user, always within `CODE_MIN..=CODE_MAX`
    pub code: u16,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Issues a new random code valid for `CODE_TTL_MINUTES` from now
    pub fn generate() -> Self {
        Self::issue_at(Utc::now(), Duration::minutes(CODE_TTL_MINUTES))
    }

    /// Issues a new random code valid for `ttl` starting at `now`
    pub fn issue_at(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            code: rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX),
            expires_at: now + ttl,
        }
    }

    /// Checks if the code has expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks if the code has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether `candidate` is this code and the code is still live at `now`.
    ///
    /// Surrounding whitespace in the candidate is ignored; anything that is not
    /// a plain decimal number never matches.
    pub fn matches_at(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        if self.is_expired_at(now) {
            return false;
        }
        candidate
            .trim()
            .parse::<u16>()
            .map(|value| value == self.code)
            .unwrap_or(false)
    }

    /// Whether `candidate` is this code and the code is still live
    pub fn matches(&self, candidate: &str) -> bool {
        self.matches_at(candidate, Utc::now())
    }
}
