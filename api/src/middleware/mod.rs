pub mod auth;
pub mod body;
pub mod cors;
pub mod sanitize;

pub use auth::{AuthContext, JwtAuth};
pub use cors::create_cors;
pub use sanitize::Sanitize;
