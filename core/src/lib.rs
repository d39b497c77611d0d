//! # Homebase Core
//!
//! Core business logic and domain layer for the Homebase backend.
//! This crate contains the user entity, password and token services,
//! repository interfaces, and the error types shared by the other crates.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Address, Claims, OneTimeCode, Role, User, UserProfile, Verified, CLIENT_SCHEMA,
};
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{MockUserRepository, UserRepository};
pub use services::{TokenService, TokenServiceConfig};
