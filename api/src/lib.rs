//! # Homebase API
//!
//! HTTP surface of the Homebase server: the middleware chain every request
//! passes through and the user routes built on top of it.

pub mod app;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
