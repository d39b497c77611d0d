//! Shared fixtures for the API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use hb_api::AppState;
use hb_core::repositories::MockUserRepository;
use hb_core::services::token::{TokenService, TokenServiceConfig};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(TokenServiceConfig::new(TEST_SECRET)).unwrap())
}

pub fn state(users: MockUserRepository) -> web::Data<AppState<MockUserRepository>> {
    web::Data::new(AppState::new(users, token_service()))
}
