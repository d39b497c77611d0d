//! Unit tests for token service

use uuid::Uuid;

use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenService, TokenServiceConfig};

fn service(secret: &str) -> TokenService {
    TokenService::new(TokenServiceConfig::new(secret)).unwrap()
}

#[test]
fn test_issue_and_verify() {
    let tokens = service("test-secret");
    let user_id = Uuid::new_v4();

    let token = tokens.issue(user_id).unwrap();
    let claims = tokens.verify(&token).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert!(claims.exp.is_none());
}

#[test]
fn test_wrong_secret_is_rejected() {
    let issuer = service("secret-one");
    let verifier = service("secret-two");

    let token = issuer.issue(Uuid::new_v4()).unwrap();

    match verifier.verify(&token) {
        Err(DomainError::Token(TokenError::InvalidSignature)) => {}
        other => panic!("expected invalid signature, got {:?}", other),
    }
}

#[test]
fn test_garbage_token_is_rejected() {
    let tokens = service("test-secret");

    match tokens.verify("not.a.token") {
        Err(DomainError::Token(TokenError::InvalidTokenFormat)) => {}
        other => panic!("expected invalid format, got {:?}", other),
    }
}

#[test]
fn test_tokens_with_ttl_carry_exp() {
    let tokens = TokenService::new(TokenServiceConfig::new("test-secret").with_ttl_seconds(600)).unwrap();

    let token = tokens.issue(Uuid::new_v4()).unwrap();
    let claims = tokens.verify(&token).unwrap();

    assert_eq!(claims.exp, Some(claims.iat + 600));
    assert_eq!(tokens.token_ttl_seconds(), Some(600));
}

#[test]
fn test_expired_token_is_rejected() {
    // Issued already two minutes past expiry, beyond the default leeway
    let tokens = TokenService::new(TokenServiceConfig::new("test-secret").with_ttl_seconds(-120)).unwrap();

    let token = tokens.issue(Uuid::new_v4()).unwrap();

    match tokens.verify(&token) {
        Err(DomainError::Token(TokenError::TokenExpired)) => {}
        other => panic!("expected expired token, got {:?}", other),
    }
}

#[test]
fn test_expiring_service_requires_exp() {
    let never_expiring = service("test-secret");
    let expiring = TokenService::new(TokenServiceConfig::new("test-secret").with_ttl_seconds(600)).unwrap();

    let token = never_expiring.issue(Uuid::new_v4()).unwrap();

    match expiring.verify(&token) {
        Err(DomainError::Token(TokenError::MissingClaim { claim })) => assert_eq!(claim, "exp"),
        other => panic!("expected missing exp claim, got {:?}", other),
    }
}

#[test]
fn test_empty_secret_is_refused() {
    assert!(TokenService::new(TokenServiceConfig::new("")).is_err());
}

#[test]
fn test_out_of_range_ttl_is_refused() {
    for ttl in [i64::MAX, i64::MIN] {
        let config = TokenServiceConfig::new("test-secret").with_ttl_seconds(ttl);
        assert!(matches!(
            TokenService::new(config),
            Err(DomainError::Internal { .. })
        ));
    }
}

#[test]
fn test_long_but_representable_ttl_issues() {
    let ttl = 100 * 365 * 24 * 60 * 60;
    let tokens = TokenService::new(TokenServiceConfig::new("test-secret").with_ttl_seconds(ttl)).unwrap();

    let token = tokens.issue(Uuid::new_v4()).unwrap();
    let claims = tokens.verify(&token).unwrap();
    assert_eq!(claims.exp, Some(claims.iat + ttl));
}
