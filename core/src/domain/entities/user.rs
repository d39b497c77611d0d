//! User entity representing a registered account in the Homebase system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::one_time_code::OneTimeCode;
use crate::domain::entities::profile::UserProfile;
use crate::errors::{DomainError, DomainResult};
use crate::services::password;
use crate::services::token::TokenService;

/// Wire values accepted for [`Role`]
pub const SUPPORTED_ROLES: [&str; 3] = ["user", "office", "admin"];

/// Authorization level of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer account
    #[default]
    User,
    /// Back-office staff
    Office,
    /// Full administrative access
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Office => "office",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "office" => Ok(Role::Office),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::validation(format!(
                "unsupported role '{}', expected one of {}",
                other,
                SUPPORTED_ROLES.join(", ")
            ))),
        }
    }
}

/// A delivery address saved on the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    /// Label chosen by the user ("Home", "Office", ...)
    #[validate(length(min = 1, message = "address title is required"))]
    pub title: String,

    /// Reference to a City record
    pub city: Uuid,

    /// Reference to a Region record
    pub region: Uuid,

    #[validate(length(min = 1, message = "address street is required"))]
    pub street: String,
}

impl Address {
    pub fn new(title: impl Into<String>, city: Uuid, region: Uuid, street: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            city,
            region,
            street: street.into(),
        }
    }
}

/// Per-channel verification state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Verified {
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub phone: bool,
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user
    #[serde(rename = "_id")]
    pub id: Uuid,

    #[serde(rename = "avatarURL", default)]
    pub avatar_url: String,

    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    /// Unique across all users
    #[validate(email(message = "email is invalid"))]
    pub email: String,

    /// Unique across all users
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,

    #[validate(nested)]
    #[serde(default)]
    pub address: Vec<Address>,

    /// bcrypt hash of the password, empty until one is set
    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub verified: Verified,

    #[serde(default)]
    pub email_verification_code: Option<OneTimeCode>,

    #[serde(default)]
    pub phone_verification_code: Option<OneTimeCode>,

    #[serde(default)]
    pub reset_password_code: Option<OneTimeCode>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unverified user with the `user` role.
    ///
    /// Name, email and phone are trimmed; nothing else is checked until
    /// [`User::validate_fields`] runs.
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            avatar_url: String::new(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            address: Vec::new(),
            password: String::new(),
            role: Role::default(),
            verified: Verified::default(),
            email_verification_code: None,
            phone_verification_code: None,
            reset_password_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Runs field validation on the user and every address
    pub fn validate_fields(&self) -> DomainResult<()> {
        self.validate().map_err(DomainError::from)
    }

    /// Replaces the email verification code with a fresh one
    pub fn update_email_verification_code(&mut self) -> OneTimeCode {
        let code = OneTimeCode::generate();
        self.email_verification_code = Some(code);
        self.touch();
        code
    }

    /// Replaces the phone verification code with a fresh one
    pub fn update_phone_verification_code(&mut self) -> OneTimeCode {
        let code = OneTimeCode::generate();
        self.phone_verification_code = Some(code);
        self.touch();
        code
    }

    /// Replaces the password reset code with a fresh one
    pub fn generate_password_reset_code(&mut self) -> OneTimeCode {
        let code = OneTimeCode::generate();
        self.reset_password_code = Some(code);
        self.touch();
        code
    }

    /// Marks the email address as verified. The caller is responsible for
    /// having checked the code.
    pub fn verify_email(&mut self) {
        self.verified.email = true;
        self.touch();
    }

    /// Marks the phone number as verified. The caller is responsible for
    /// having checked the code.
    pub fn verify_phone(&mut self) {
        self.verified.phone = true;
        self.touch();
    }

    /// Stores an already computed password hash
    pub fn set_password_hash(&mut self, hash: &str) {
        self.password = hash.trim().to_string();
        self.touch();
    }

    /// Hashes `plain` with the given bcrypt cost and stores the result
    pub async fn set_password(&mut self, plain: &str, cost: u32) -> DomainResult<()> {
        let hash = password::hash_password(plain, cost).await?;
        self.set_password_hash(&hash);
        Ok(())
    }

    /// Compares a plaintext candidate against the stored password hash
    pub async fn compare_password(&self, candidate: &str) -> DomainResult<bool> {
        password::verify_password(candidate, &self.password).await
    }

    /// Issues a signed auth token whose subject is this user's id
    pub fn generate_auth_token(&self, tokens: &TokenService) -> DomainResult<String> {
        tokens.issue(self.id)
    }

    /// The client-facing projection of this user
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
