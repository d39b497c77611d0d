//! Domain entities representing core business objects.

pub mod one_time_code;
pub mod profile;
pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use one_time_code::{OneTimeCode, CODE_MAX, CODE_MIN, CODE_TTL_MINUTES};
pub use profile::{UserProfile, CLIENT_SCHEMA};
pub use token::Claims;
pub use user::{Address, Role, User, Verified, SUPPORTED_ROLES};
