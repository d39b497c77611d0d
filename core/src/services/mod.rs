//! Business services containing domain logic.

pub mod password;
pub mod token;

// Re-export commonly used types
pub use password::{hash_password, verify_password};
pub use token::{TokenService, TokenServiceConfig};
