//! User routes

pub mod me;

pub use me::me;
