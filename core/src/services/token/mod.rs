//! Token service module for JWT management
//!
//! Auth tokens carry only the user id as subject and are signed with a
//! shared HS256 secret, so any holder of the secret can verify them.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
