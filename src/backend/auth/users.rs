//! User Model and Database Operations
//!
//! Account rows and the queries over them. The full `User` row (with hash
//! and provider linkage) never leaves the backend; everything outward goes
//! through `to_public()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::UserPublic;

/// User row as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Mobile number (unique when present; absent for social accounts)
    pub mobile: Option<String>,
    /// Bcrypt hash; None only for half-created social accounts
    pub password_hash: Option<String>,
    /// Social provider name (google, facebook, linkedin), if any
    pub provider: Option<String>,
    /// Provider-side account id
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Strip auth material down to the display profile.
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
        }
    }
}

/// Create a locally registered user.
pub async fn create_user(
    pool: &PgPool,
    name: String,
    email: String,
    mobile: Option<String>,
    password_hash: String,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, mobile, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, email, mobile, password_hash, provider, provider_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&name)
    .bind(&email)
    .bind(&mobile)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Create a user arriving through a social credential flow.
pub async fn create_social_user(
    pool: &PgPool,
    name: String,
    email: String,
    password_hash: String,
    provider: Option<String>,
    provider_id: Option<String>,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password_hash, provider, provider_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, name, email, mobile, password_hash, provider, provider_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(&provider)
    .bind(&provider_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Get user by ID.
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, mobile, password_hash, provider, provider_id, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get user by email.
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, mobile, password_hash, provider, provider_id, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Get user by mobile.
pub async fn get_user_by_mobile(pool: &PgPool, mobile: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, mobile, password_hash, provider, provider_id, created_at, updated_at
        FROM users
        WHERE mobile = $1
        "#,
    )
    .bind(mobile)
    .fetch_optional(pool)
    .await
}

/// Get user by email or mobile - the login form accepts either.
pub async fn get_user_by_email_or_mobile(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, mobile, password_hash, provider, provider_id, created_at, updated_at
        FROM users
        WHERE email = $1 OR mobile = $1
        "#,
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await
}

/// All users, for the contact sidebar. Ordered by name for stable display.
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, mobile, password_hash, provider, provider_id, created_at, updated_at
        FROM users
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Update a user's display name and mobile. Fields left as None keep
/// their stored value.
pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    name: Option<String>,
    mobile: Option<String>,
) -> Result<Option<User>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($1, name),
            mobile = COALESCE($2, mobile),
            updated_at = $3
        WHERE id = $4
        RETURNING id, name, email, mobile, password_hash, provider, provider_id, created_at, updated_at
        "#,
    )
    .bind(&name)
    .bind(&mobile)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a user account. Messages referencing it cascade.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
