//! MySQL implementation of the UserRepository trait.
//!
//! Addresses and one-time codes are stored as JSON columns. The unique keys
//! on `email` and `phone` are the source of truth for duplicate detection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{MySql, MySqlPool, Row};
use uuid::Uuid;

use hb_core::domain::entities::one_time_code::OneTimeCode;
use hb_core::domain::entities::user::{Address, Role, User, Verified};
use hb_core::errors::DomainError;
use hb_core::repositories::UserRepository;

const USER_COLUMNS: &str = r#"
    id, avatar_url, name, email, phone, address, password, role,
    verified_email, verified_phone,
    email_verification_code, phone_verification_code, reset_password_code,
    created_at, updated_at
"#;

/// MySQL implementation of UserRepository
#[derive(Clone)]
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
    where
        T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
    {
        row.try_get(name)
            .map_err(|e| DomainError::Database(format!("Failed to get {}: {}", name, e)))
    }

    /// Convert database row to User entity
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let id: String = Self::column(row, "id")?;
        let role: String = Self::column(row, "role")?;
        let address: Json<Vec<Address>> = Self::column(row, "address")?;
        let email_code: Option<Json<OneTimeCode>> = Self::column(row, "email_verification_code")?;
        let phone_code: Option<Json<OneTimeCode>> = Self::column(row, "phone_verification_code")?;
        let reset_code: Option<Json<OneTimeCode>> = Self::column(row, "reset_password_code")?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Database(format!("Invalid UUID: {}", e)))?,
            avatar_url: Self::column(row, "avatar_url")?,
            name: Self::column(row, "name")?,
            email: Self::column(row, "email")?,
            phone: Self::column(row, "phone")?,
            address: address.0,
            password: Self::column(row, "password")?,
            role: role
                .parse::<Role>()
                .map_err(|e| DomainError::Database(format!("Invalid role: {}", e)))?,
            verified: Verified {
                email: Self::column(row, "verified_email")?,
                phone: Self::column(row, "verified_phone")?,
            },
            email_verification_code: email_code.map(|c| c.0),
            phone_verification_code: phone_code.map(|c| c.0),
            reset_password_code: reset_code.map(|c| c.0),
            created_at: Self::column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: Self::column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }

    async fn find_one_by(&self, column: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = ? LIMIT 1", USER_COLUMNS, column);

        let result = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}

/// Maps a unique key violation message to the user field it guards.
///
/// MySQL reports `Duplicate entry '<value>' for key '<key>'`. Only the key
/// name is matched, never the duplicated value.
pub(crate) fn duplicate_field_from_message(message: &str) -> &'static str {
    let key = message
        .rsplit_once(" for key ")
        .map_or("", |(_, key)| key.trim_matches(|c: char| c == '\'' || c == '`'));
    let key = key.rsplit('.').next().unwrap_or(key);

    match key {
        "uniq_users_email" => "email",
        "uniq_users_phone" => "phone",
        _ => "_id",
    }
}

fn map_write_error(action: &str, error: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_unique_violation() {
            let field = duplicate_field_from_message(db_err.message());
            tracing::debug!(field, "Rejected duplicate user {}", field);
            return DomainError::duplicate(field);
        }
    }
    tracing::error!("Failed to {} user: {}", action, error);
    DomainError::Database(format!("Failed to {} user: {}", action, error))
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find_one_by("id", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one_by("email", email.to_string()).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        self.find_one_by("phone", phone.to_string()).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = format!(
            "INSERT INTO users ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            USER_COLUMNS
        );

        sqlx::query(&query)
            .bind(user.id.to_string())
            .bind(&user.avatar_url)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(Json(&user.address))
            .bind(&user.password)
            .bind(user.role.as_str())
            .bind(user.verified.email)
            .bind(user.verified.phone)
            .bind(user.email_verification_code.map(Json))
            .bind(user.phone_verification_code.map(Json))
            .bind(user.reset_password_code.map(Json))
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error("create", e))?;

        Ok(user)
    }

    async fn update(&self, mut user: User) -> Result<User, DomainError> {
        // Always update the timestamp
        user.updated_at = Utc::now();

        let query = r#"
            UPDATE users SET
                avatar_url = ?,
                name = ?,
                email = ?,
                phone = ?,
                address = ?,
                password = ?,
                role = ?,
                verified_email = ?,
                verified_phone = ?,
                email_verification_code = ?,
                phone_verification_code = ?,
                reset_password_code = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.avatar_url)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(Json(&user.address))
            .bind(&user.password)
            .bind(user.role.as_str())
            .bind(user.verified.email)
            .bind(user.verified.phone)
            .bind(user.email_verification_code.map(Json))
            .bind(user.phone_verification_code.map(Json))
            .bind(user.reset_password_code.map(Json))
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error("update", e))?;

        // MySQL reports changed rows, so confirm a zero count really means missing
        if result.rows_affected() == 0 && self.find_by_id(user.id).await?.is_none() {
            return Err(DomainError::not_found("User"));
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
