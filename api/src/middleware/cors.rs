//! CORS middleware configuration for cross-origin requests.
//!
//! Every origin is accepted and reflected back in
//! `Access-Control-Allow-Origin`, with any method and any request header.
//! Only the preflight cache lifetime is configurable.

use actix_cors::Cors;
use hb_shared::config::CorsConfig;

/// Creates the CORS middleware from configuration
pub fn create_cors(config: &CorsConfig) -> Cors {
    tracing::info!(max_age = config.max_age, "Configuring CORS for all origins");

    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(config.max_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::header, test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_preflight_reflects_origin() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&CorsConfig { max_age: 600 }))
                .route("/ping", web::post().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/ping")
            .insert_header((header::ORIGIN, "https://anywhere.example"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom-header"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let headers = resp.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://anywhere.example"
        );
        assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "600");
    }
}
