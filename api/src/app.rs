//! Application state and factory
//!
//! Builds the Actix-web application: body parsing limits, the middleware
//! chain, and the route table.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::{InternalError, JsonPayloadError, UrlencodedError},
    http::StatusCode,
    web, App, Error, HttpResponse,
};
use hb_core::repositories::UserRepository;
use hb_core::services::token::TokenService;
use hb_shared::config::AppConfig;
use hb_shared::errors::{error_codes, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::middleware::{create_cors, JwtAuth, Sanitize};
use crate::routes::{health::health_check, users};

/// Shared state handed to every handler
pub struct AppState<R: UserRepository> {
    pub users: R,
    pub tokens: Arc<TokenService>,
}

impl<R: UserRepository> AppState<R> {
    pub fn new(users: R, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }
}

/// Create and configure the application
///
/// Requests pass, outermost first, through request logging, CORS, XSS
/// sanitization and operator-key sanitization before routing. JSON and
/// URL-encoded bodies are limited to `server.max_payload_size` bytes.
pub fn create_app<R>(
    state: web::Data<AppState<R>>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    R: UserRepository + 'static,
{
    let limit = config.server.max_payload_size;
    let tokens = Arc::clone(&state.tokens);

    App::new()
        .app_data(state)
        .app_data(json_config(limit))
        .app_data(form_config(limit))
        .app_data(web::PayloadConfig::new(limit))
        // The last registered middleware runs first
        .wrap(Sanitize::query_operators())
        .wrap(Sanitize::xss())
        .wrap(create_cors(&config.cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/users")
                    .wrap(JwtAuth::new(tokens))
                    .route("/me", web::get().to(users::me::<R>)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// JSON body parsing; malformed bodies become a JSON 400
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, req| {
            tracing::debug!(path = %req.path(), error = %err, "Rejected JSON body");

            let status = match err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    StatusCode::PAYLOAD_TOO_LARGE
                }
                _ => StatusCode::BAD_REQUEST,
            };
            let body = ErrorResponse::new(error_codes::INVALID_JSON, err.to_string());

            InternalError::from_response(err, HttpResponse::build(status).json(body)).into()
        })
}

/// URL-encoded body parsing; malformed bodies become a JSON 400
pub fn form_config(limit: usize) -> web::FormConfig {
    web::FormConfig::default()
        .limit(limit)
        .error_handler(|err, req| {
            tracing::debug!(path = %req.path(), error = %err, "Rejected form body");

            let status = match err {
                UrlencodedError::Overflow { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            let body = ErrorResponse::new(error_codes::INVALID_FORM, err.to_string());

            InternalError::from_response(err, HttpResponse::build(status).json(body)).into()
        })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
