//! Profiles vertical slice

use crate::error::{Result, StorageError};
use bandmate_core::types::{Profile, UserId};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Insert a new profile
pub async fn create(pool: &SqlitePool, profile: &Profile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, email, display_name, avatar_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&profile.user_id)
    .bind(&profile.email)
    .bind(&profile.display_name)
    .bind(&profile.avatar_url)
    .bind(&profile.created_at)
    .bind(&profile.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a profile unless one already exists for the user
///
/// Returns `true` if a row was inserted. Used by the data-repair endpoint,
/// which must stay idempotent.
pub async fn create_if_missing(pool: &SqlitePool, profile: &Profile) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO profiles (user_id, email, display_name, avatar_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(&profile.user_id)
    .bind(&profile.email)
    .bind(&profile.display_name)
    .bind(&profile.avatar_url)
    .bind(&profile.created_at)
    .bind(&profile.updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Get profile by user ID
pub async fn get_by_user_id(pool: &SqlitePool, user_id: &UserId) -> Result<Option<Profile>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, email, display_name, avatar_url, created_at, updated_at
        FROM profiles WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Profile {
        user_id: row.get("user_id"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        avatar_url: row.get("avatar_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }))
}

/// Get profile by email (exact match)
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Profile>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, email, display_name, avatar_url, created_at, updated_at
        FROM profiles WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Profile {
        user_id: row.get("user_id"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        avatar_url: row.get("avatar_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }))
}

/// Set the avatar URL, bumping `updated_at`
pub async fn set_avatar_url(pool: &SqlitePool, user_id: &UserId, url: &str) -> Result<()> {
    let result = sqlx::query(
        "UPDATE profiles SET avatar_url = ?, updated_at = ? WHERE user_id = ?",
    )
    .bind(url)
    .bind(Utc::now().to_rfc3339())
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Profile", user_id.as_str()));
    }

    Ok(())
}

/// Most recently created profiles, newest first
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Profile>> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, email, display_name, avatar_url, created_at, updated_at
        FROM profiles ORDER BY created_at DESC LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Profile {
            user_id: row.get("user_id"),
            email: row.get("email"),
            display_name: row.get("display_name"),
            avatar_url: row.get("avatar_url"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .collect())
}
