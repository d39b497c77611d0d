//! Handler for the caller's own profile.

use actix_web::{web, HttpResponse};
use hb_core::errors::DomainError;
use hb_core::repositories::UserRepository;

use crate::app::AppState;
use crate::handlers::error::ApiError;
use crate::middleware::auth::AuthContext;

/// `GET /api/v1/users/me`
///
/// Returns the authenticated user's client projection. A valid token for a
/// user that has since been deleted yields 404.
pub async fn me<R>(
    state: web::Data<AppState<R>>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError>
where
    R: UserRepository + 'static,
{
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("User"))?;

    tracing::debug!(user_id = %user.id, "Serving profile");

    Ok(HttpResponse::Ok().json(user.profile()))
}
