//! Rehearsals vertical slice

use crate::error::{Result, StorageError};
use bandmate_core::types::{BandId, Rehearsal, RehearsalId, RehearsalStatus};
use sqlx::{Row, SqlitePool};

/// Insert a new rehearsal
pub async fn create(pool: &SqlitePool, rehearsal: &Rehearsal) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO rehearsals
            (id, band_id, date, start_time, location, description, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&rehearsal.id)
    .bind(&rehearsal.band_id)
    .bind(&rehearsal.date)
    .bind(&rehearsal.start_time)
    .bind(&rehearsal.location)
    .bind(&rehearsal.description)
    .bind(rehearsal.status.as_str())
    .bind(&rehearsal.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get rehearsal by ID
pub async fn get_by_id(pool: &SqlitePool, id: &RehearsalId) -> Result<Option<Rehearsal>> {
    let row = sqlx::query(
        r#"
        SELECT id, band_id, date, start_time, location, description, status, created_at
        FROM rehearsals WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| map_rehearsal(&row)))
}

/// All rehearsals for a band, ascending by date then start time
pub async fn list_for_band(pool: &SqlitePool, band_id: &BandId) -> Result<Vec<Rehearsal>> {
    let rows = sqlx::query(
        r#"
        SELECT id, band_id, date, start_time, location, description, status, created_at
        FROM rehearsals WHERE band_id = ?
        ORDER BY date, start_time
        "#,
    )
    .bind(band_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| map_rehearsal(&row)).collect())
}

/// Rehearsals on or after a date, ascending
///
/// `from_date` is ISO `YYYY-MM-DD`; string comparison is date comparison
/// for that format.
pub async fn list_upcoming(
    pool: &SqlitePool,
    band_id: &BandId,
    from_date: &str,
) -> Result<Vec<Rehearsal>> {
    let rows = sqlx::query(
        r#"
        SELECT id, band_id, date, start_time, location, description, status, created_at
        FROM rehearsals WHERE band_id = ? AND date >= ?
        ORDER BY date, start_time
        "#,
    )
    .bind(band_id)
    .bind(from_date)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| map_rehearsal(&row)).collect())
}

/// Update a rehearsal's status
pub async fn update_status(
    pool: &SqlitePool,
    id: &RehearsalId,
    status: RehearsalStatus,
) -> Result<()> {
    let result = sqlx::query("UPDATE rehearsals SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Rehearsal", id.as_str()));
    }

    Ok(())
}

fn map_rehearsal(row: &sqlx::sqlite::SqliteRow) -> Rehearsal {
    let status: String = row.get("status");
    Rehearsal {
        id: row.get("id"),
        band_id: row.get("band_id"),
        date: row.get("date"),
        start_time: row.get("start_time"),
        location: row.get("location"),
        description: row.get("description"),
        // Schema CHECK keeps this column in range
        status: RehearsalStatus::from_str(&status).unwrap_or(RehearsalStatus::Scheduled),
        created_at: row.get("created_at"),
    }
}
