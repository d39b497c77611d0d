//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository interfaces for the
//! Homebase server. Users are persisted in MySQL through SQLx.

/// Database module - MySQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, MySqlUserRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
