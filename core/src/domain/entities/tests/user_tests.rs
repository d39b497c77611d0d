//! Unit tests for user entity

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::one_time_code::{CODE_MAX, CODE_MIN, CODE_TTL_MINUTES};
use crate::domain::entities::user::{Address, Role, User, SUPPORTED_ROLES};
use crate::errors::DomainError;
use crate::services::token::{TokenService, TokenServiceConfig};

fn sample_user() -> User {
    User::new("Ana Lima", "ana@example.com", "+15550100")
}

#[test]
fn test_new_user_creation() {
    let user = User::new("  Ana Lima ", " ana@example.com\n", " +15550100 ");

    assert_eq!(user.name, "Ana Lima");
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.phone, "+15550100");
    assert_eq!(user.avatar_url, "");
    assert_eq!(user.password, "");
    assert_eq!(user.role, Role::User);
    assert!(user.address.is_empty());
    assert!(!user.verified.email);
    assert!(!user.verified.phone);
    assert!(user.email_verification_code.is_none());
    assert!(user.phone_verification_code.is_none());
    assert!(user.reset_password_code.is_none());
    assert_eq!(user.created_at, user.updated_at);
}

#[test]
fn test_email_verification_code() {
    let mut user = sample_user();
    let before = Utc::now();

    let code = user.update_email_verification_code();

    assert_eq!(user.email_verification_code, Some(code));
    assert!((CODE_MIN..=CODE_MAX).contains(&code.code));
    assert!(code.expires_at >= before + Duration::minutes(CODE_TTL_MINUTES));
    assert!(code.expires_at <= Utc::now() + Duration::minutes(CODE_TTL_MINUTES));
    assert!(user.phone_verification_code.is_none());
    assert!(user.reset_password_code.is_none());
}

#[test]
fn test_phone_verification_code() {
    let mut user = sample_user();

    let code = user.update_phone_verification_code();

    assert_eq!(user.phone_verification_code, Some(code));
    assert!((CODE_MIN..=CODE_MAX).contains(&code.code));
    assert!(!code.is_expired());
    assert!(user.email_verification_code.is_none());
}

#[test]
fn test_password_reset_code() {
    let mut user = sample_user();

    let first = user.generate_password_reset_code();
    let second = user.generate_password_reset_code();

    // The latest code always replaces the previous one
    assert_eq!(user.reset_password_code, Some(second));
    assert!(second.expires_at >= first.expires_at);
}

#[test]
fn test_verify_email_only_sets_email_flag() {
    let mut user = sample_user();

    user.verify_email();

    assert!(user.verified.email);
    assert!(!user.verified.phone);
}

#[test]
fn test_verify_phone_only_sets_phone_flag() {
    let mut user = sample_user();

    user.verify_phone();

    assert!(user.verified.phone);
    assert!(!user.verified.email);

    // Idempotent, and leaves the other flag alone once set
    user.verify_email();
    user.verify_phone();
    assert!(user.verified.phone);
    assert!(user.verified.email);
}

#[test]
fn test_mutations_bump_updated_at() {
    let mut user = sample_user();
    let created = user.updated_at;

    std::thread::sleep(std::time::Duration::from_millis(5));
    user.verify_email();

    assert!(user.updated_at > created);
    assert_eq!(user.created_at, created);
}

#[test]
fn test_role_parsing() {
    for wire in SUPPORTED_ROLES {
        let role: Role = wire.parse().unwrap();
        assert_eq!(role.as_str(), wire);
        assert_eq!(serde_json::to_string(&role).unwrap(), format!("\"{}\"", wire));
    }

    let err = "superuser".parse::<Role>().unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    assert!(serde_json::from_str::<Role>("\"root\"").is_err());
}

#[test]
fn test_validation_accepts_complete_user() {
    let mut user = sample_user();
    user.address.push(Address::new("Home", Uuid::new_v4(), Uuid::new_v4(), "1 Main St"));

    assert!(user.validate_fields().is_ok());
}

#[test]
fn test_validation_rejects_missing_fields() {
    let user = User::new("   ", "ana@example.com", "+15550100");
    assert!(matches!(user.validate_fields(), Err(DomainError::Validation { .. })));

    let user = User::new("Ana", "not-an-email", "+15550100");
    let err = user.validate_fields().unwrap_err();
    assert!(err.to_string().contains("email"));

    let user = User::new("Ana", "ana@example.com", "");
    assert!(user.validate_fields().is_err());
}

#[test]
fn test_validation_rejects_incomplete_address() {
    let mut user = sample_user();
    user.address.push(Address::new("", Uuid::new_v4(), Uuid::new_v4(), "1 Main St"));
    assert!(user.validate_fields().is_err());

    let mut user = sample_user();
    user.address.push(Address::new("Home", Uuid::new_v4(), Uuid::new_v4(), ""));
    assert!(user.validate_fields().is_err());
}

#[test]
fn test_serialization_wire_names() {
    let mut user = sample_user();
    user.update_phone_verification_code();

    let json = serde_json::to_value(&user).unwrap();

    assert_eq!(json["_id"], user.id.to_string());
    assert_eq!(json["avatarURL"], "");
    assert!(json["phoneVerificationCode"]["expiresAt"].is_string());
    assert!(json["emailVerificationCode"].is_null());
    assert!(json.get("createdAt").is_some());

    let back: User = serde_json::from_value(json).unwrap();
    assert_eq!(back, user);
}

#[test]
fn test_deserialization_applies_defaults() {
    let json = serde_json::json!({
        "_id": Uuid::new_v4(),
        "name": "Ana",
        "email": "ana@example.com",
        "phone": "+15550100",
        "createdAt": Utc::now(),
        "updatedAt": Utc::now()
    });

    let user: User = serde_json::from_value(json).unwrap();

    assert_eq!(user.role, Role::User);
    assert!(!user.verified.email);
    assert!(user.address.is_empty());
    assert!(user.reset_password_code.is_none());
}

#[test]
fn test_generate_auth_token_subject_is_user_id() {
    let tokens = TokenService::new(TokenServiceConfig::new("unit-test-secret")).unwrap();
    let user = sample_user();

    let token = user.generate_auth_token(&tokens).unwrap();
    let claims = tokens.verify(&token).unwrap();

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.user_id().unwrap(), user.id);
}

#[tokio::test]
async fn test_compare_password() {
    let mut user = sample_user();
    user.set_password("correct horse battery staple", 4).await.unwrap();

    assert!(user.password.starts_with("$2"));
    assert!(user.compare_password("correct horse battery staple").await.unwrap());
    assert!(!user.compare_password("correct horse battery stapl").await.unwrap());
    assert!(!user.compare_password("").await.unwrap());
}

#[tokio::test]
async fn test_compare_password_without_hash_is_false() {
    let user = sample_user();
    assert!(!user.compare_password("anything").await.unwrap());
}
