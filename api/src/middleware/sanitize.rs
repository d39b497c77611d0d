//! Request sanitization middleware.
//!
//! Each instance applies a single [`SanitizeRule`] to the query string and to
//! JSON or URL-encoded bodies before the request reaches routing. Register
//! one instance per rule; other content types pass through untouched.
//! A body that cannot be read (too large, broken stream) is answered with
//! a JSON error carrying the corresponding status.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use hb_shared::errors::{error_codes, ErrorResponse};
use hb_shared::SanitizeRule;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use super::body;

/// Sanitization middleware factory
#[derive(Debug, Clone, Copy)]
pub struct Sanitize {
    rule: SanitizeRule,
}

impl Sanitize {
    pub fn new(rule: SanitizeRule) -> Self {
        Self { rule }
    }

    /// Escapes markup in every string, keys included
    pub fn xss() -> Self {
        Self::new(SanitizeRule::Xss)
    }

    /// Removes `$`-prefixed and dotted keys
    pub fn query_operators() -> Self {
        Self::new(SanitizeRule::QueryOperators)
    }

    pub fn rule(&self) -> SanitizeRule {
        self.rule
    }
}

impl<S, B> Transform<S, ServiceRequest> for Sanitize
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SanitizeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SanitizeMiddleware {
            service: Rc::new(service),
            rule: self.rule,
        }))
    }
}

/// Sanitization middleware service implementation
pub struct SanitizeMiddleware<S> {
    service: Rc<S>,
    rule: SanitizeRule,
}

impl<S, B> Service<ServiceRequest> for SanitizeMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let rule = self.rule;

        Box::pin(async move {
            let outcome = sanitize(&mut req, rule).await;
            match outcome {
                Ok((query_changes, body_changes)) if query_changes + body_changes > 0 => {
                    tracing::debug!(
                        rule = rule.name(),
                        query_changes,
                        body_changes,
                        path = %req.path(),
                        "Sanitized request input"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(rule = rule.name(), error = %e, "Could not read request input");
                    let response = rejection_response(&e).map_into_right_body();
                    return Ok(req.into_response(response));
                }
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// JSON error for input that could not be read, keeping the underlying status
fn rejection_response(error: &Error) -> HttpResponse {
    let status = error.as_response_error().status_code();
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        error_codes::PAYLOAD_TOO_LARGE
    } else {
        error_codes::BAD_REQUEST
    };

    HttpResponse::build(status).json(ErrorResponse::new(code, error.to_string()))
}

async fn sanitize(req: &mut ServiceRequest, rule: SanitizeRule) -> Result<(usize, usize), Error> {
    let query_changes = body::sanitize_query(req, rule)?;
    let body_changes = body::sanitize_body(req, rule).await?;
    Ok((query_changes, body_changes))
}
