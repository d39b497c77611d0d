use std::io;
use std::sync::Arc;

use actix_web::{web, HttpServer};
use hb_api::{create_app, telemetry, AppState};
use hb_core::services::token::{TokenService, TokenServiceConfig};
use hb_infra::database::{DatabasePool, MySqlUserRepository};
use hb_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    telemetry::init_tracing(&config.logging).map_err(io::Error::other)?;

    tracing::info!(
        environment = %config.environment,
        "Starting Homebase API Server"
    );

    let pool = DatabasePool::new(config.database.clone())
        .await
        .map_err(io::Error::other)?;
    pool.ensure_schema().await.map_err(io::Error::other)?;

    let tokens = TokenService::new(TokenServiceConfig::from(&config.auth)).map_err(io::Error::other)?;
    let state = web::Data::new(AppState::new(
        MySqlUserRepository::new(pool.get_pool().clone()),
        Arc::new(tokens),
    ));

    let bind_address = config.server.bind_address();
    tracing::info!("Server will bind to: {}", bind_address);

    let app_config = config.clone();
    HttpServer::new(move || create_app(state.clone(), &app_config))
        .bind(&bind_address)?
        .run()
        .await?;

    pool.close().await;
    Ok(())
}
