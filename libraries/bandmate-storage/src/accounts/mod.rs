//! Accounts vertical slice
//!
//! Registration-time inserts and credential lookups. The password hash is
//! bound on insert and only ever read back through [`get_password_hash`];
//! the [`Account`] domain type never carries it.

use crate::error::{Result, StorageError};
use bandmate_core::types::{Account, UserId};
use sqlx::{Row, SqlitePool};

/// Insert a new account with its password hash
///
/// Fails with `Conflict` if the email is already registered.
pub async fn create(pool: &SqlitePool, account: &Account, password_hash: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO accounts (id, email, password_hash, display_name, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&account.id)
    .bind(&account.email)
    .bind(password_hash)
    .bind(&account.display_name)
    .bind(&account.created_at)
    .execute(pool)
    .await
    .map_err(|e| StorageError::on_unique_violation(e, "email already registered"))?;

    Ok(())
}

/// Get account by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<Account>> {
    let row = sqlx::query(
        "SELECT id, email, display_name, created_at FROM accounts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Account {
        id: row.get("id"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        created_at: row.get("created_at"),
    }))
}

/// Get account by email (exact match; callers lowercase first)
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Account>> {
    let row = sqlx::query(
        "SELECT id, email, display_name, created_at FROM accounts WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Account {
        id: row.get("id"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        created_at: row.get("created_at"),
    }))
}

/// Get the stored password hash for a user
pub async fn get_password_hash(pool: &SqlitePool, id: &UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM accounts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| row.get("password_hash")))
}
