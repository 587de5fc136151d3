//! Bands vertical slice
//!
//! Band rows plus the membership table. Role checks are exposed as plain
//! lookups; the server decides what a role is allowed to do.

use crate::error::Result;
use bandmate_core::types::{Band, BandId, BandMembership, MemberRole, UserId};
use sqlx::{Row, SqlitePool};

/// Create a band and enroll its creator as admin, atomically
pub async fn create(pool: &SqlitePool, band: &Band) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO bands (id, name, invite_code, created_by, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&band.id)
    .bind(&band.name)
    .bind(&band.invite_code)
    .bind(&band.created_by)
    .bind(&band.created_at)
    .execute(&mut *tx)
    .await?;

    let membership = BandMembership::new(band.id.clone(), band.created_by.clone(), MemberRole::Admin);
    sqlx::query(
        r#"
        INSERT INTO band_members (band_id, user_id, role, joined_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&membership.band_id)
    .bind(&membership.user_id)
    .bind(membership.role.as_str())
    .bind(&membership.joined_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Get band by ID
pub async fn get_by_id(pool: &SqlitePool, id: &BandId) -> Result<Option<Band>> {
    let row = sqlx::query(
        "SELECT id, name, invite_code, created_by, created_at FROM bands WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Band {
        id: row.get("id"),
        name: row.get("name"),
        invite_code: row.get("invite_code"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
    }))
}

/// Get band by invite code
pub async fn get_by_invite_code(pool: &SqlitePool, code: &str) -> Result<Option<Band>> {
    let row = sqlx::query(
        "SELECT id, name, invite_code, created_by, created_at FROM bands WHERE invite_code = ?",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Band {
        id: row.get("id"),
        name: row.get("name"),
        invite_code: row.get("invite_code"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
    }))
}

/// Add a member; joining a band twice is a no-op
///
/// Returns `true` if the membership row was inserted.
pub async fn add_member(pool: &SqlitePool, membership: &BandMembership) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO band_members (band_id, user_id, role, joined_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(band_id, user_id) DO NOTHING
        "#,
    )
    .bind(&membership.band_id)
    .bind(&membership.user_id)
    .bind(membership.role.as_str())
    .bind(&membership.joined_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Role of a user inside a band; `None` if not a member
pub async fn get_member_role(
    pool: &SqlitePool,
    band_id: &BandId,
    user_id: &UserId,
) -> Result<Option<MemberRole>> {
    let row = sqlx::query("SELECT role FROM band_members WHERE band_id = ? AND user_id = ?")
        .bind(band_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|row| {
        let role: String = row.get("role");
        MemberRole::from_str(&role)
    }))
}

/// All bands a user belongs to, with their role in each
pub async fn get_user_bands(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<(Band, MemberRole)>> {
    let rows = sqlx::query(
        r#"
        SELECT b.id, b.name, b.invite_code, b.created_by, b.created_at, bm.role
        FROM bands b
        INNER JOIN band_members bm ON b.id = bm.band_id
        WHERE bm.user_id = ?
        ORDER BY b.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let role: String = row.get("role");
            (
                Band {
                    id: row.get("id"),
                    name: row.get("name"),
                    invite_code: row.get("invite_code"),
                    created_by: row.get("created_by"),
                    created_at: row.get("created_at"),
                },
                MemberRole::from_str(&role).unwrap_or(MemberRole::Member),
            )
        })
        .collect())
}

/// Raw membership rows for a user, oldest first
pub async fn get_user_memberships(
    pool: &SqlitePool,
    user_id: &UserId,
) -> Result<Vec<BandMembership>> {
    let rows = sqlx::query(
        r#"
        SELECT band_id, user_id, role, joined_at
        FROM band_members WHERE user_id = ? ORDER BY joined_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let role: String = row.get("role");
            BandMembership {
                band_id: row.get("band_id"),
                user_id: row.get("user_id"),
                role: MemberRole::from_str(&role).unwrap_or(MemberRole::Member),
                joined_at: row.get("joined_at"),
            }
        })
        .collect())
}

/// Every band, oldest first (CLI listing)
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Band>> {
    let rows = sqlx::query(
        "SELECT id, name, invite_code, created_by, created_at FROM bands ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Band {
            id: row.get("id"),
            name: row.get("name"),
            invite_code: row.get("invite_code"),
            created_by: row.get("created_by"),
            created_at: row.get("created_at"),
        })
        .collect())
}
