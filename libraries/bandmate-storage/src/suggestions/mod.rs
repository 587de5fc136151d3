//! Song suggestions vertical slice
//!
//! Suggestions and their star ratings. The caller is responsible for
//! membership checks; deletion here is unconditional so a double delete
//! stays harmless.

use crate::error::Result;
use bandmate_core::types::{BandId, SongSuggestion, SuggestionId, SuggestionRating, UserId};
use sqlx::{Row, SqlitePool};

/// A suggestion joined with its rating aggregate
#[derive(Debug, Clone)]
pub struct SuggestionWithRatings {
    /// The suggestion row
    pub suggestion: SongSuggestion,
    /// Mean stars across all ratings, `None` when unrated
    pub average_stars: Option<f64>,
    /// Number of ratings
    pub ratings_count: i64,
}

/// Insert a new suggestion
pub async fn create(pool: &SqlitePool, suggestion: &SongSuggestion) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO song_suggestions
            (id, band_id, suggested_by, spotify_track_id, title, artist, album, album_art_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&suggestion.id)
    .bind(&suggestion.band_id)
    .bind(&suggestion.suggested_by)
    .bind(&suggestion.spotify_track_id)
    .bind(&suggestion.title)
    .bind(&suggestion.artist)
    .bind(&suggestion.album)
    .bind(&suggestion.album_art_url)
    .bind(&suggestion.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get suggestion by ID
pub async fn get_by_id(pool: &SqlitePool, id: &SuggestionId) -> Result<Option<SongSuggestion>> {
    let row = sqlx::query(
        r#"
        SELECT id, band_id, suggested_by, spotify_track_id, title, artist, album,
               album_art_url, created_at
        FROM song_suggestions WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| map_suggestion(&row)))
}

/// All suggestions for a band, newest first, with rating aggregates
pub async fn list_for_band(
    pool: &SqlitePool,
    band_id: &BandId,
) -> Result<Vec<SuggestionWithRatings>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.band_id, s.suggested_by, s.spotify_track_id, s.title, s.artist,
               s.album, s.album_art_url, s.created_at,
               AVG(r.stars) as average_stars,
               COUNT(r.stars) as ratings_count
        FROM song_suggestions s
        LEFT JOIN suggestion_ratings r ON s.id = r.suggestion_id
        WHERE s.band_id = ?
        GROUP BY s.id
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(band_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SuggestionWithRatings {
            suggestion: map_suggestion(&row),
            average_stars: row.get("average_stars"),
            ratings_count: row.get("ratings_count"),
        })
        .collect())
}

/// Delete a suggestion unconditionally
///
/// No error if the row is already gone (concurrent deletes race benignly).
pub async fn delete(pool: &SqlitePool, id: &SuggestionId) -> Result<()> {
    sqlx::query("DELETE FROM song_suggestions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Upsert a member's rating: re-rating replaces the stars
pub async fn rate(pool: &SqlitePool, rating: &SuggestionRating) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO suggestion_ratings (suggestion_id, user_id, stars, rated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(suggestion_id, user_id)
        DO UPDATE SET stars = excluded.stars, rated_at = excluded.rated_at
        "#,
    )
    .bind(&rating.suggestion_id)
    .bind(&rating.user_id)
    .bind(i64::from(rating.stars))
    .bind(&rating.rated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Rating aggregate for one suggestion: (average stars, count)
pub async fn rating_summary(
    pool: &SqlitePool,
    id: &SuggestionId,
) -> Result<(Option<f64>, i64)> {
    let row = sqlx::query(
        r#"
        SELECT AVG(stars) as average_stars, COUNT(stars) as ratings_count
        FROM suggestion_ratings WHERE suggestion_id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok((row.get("average_stars"), row.get("ratings_count")))
}

/// Per-band counts of one user's suggestions
pub async fn count_by_band_for_user(
    pool: &SqlitePool,
    user_id: &UserId,
) -> Result<Vec<(BandId, i64)>> {
    let rows = sqlx::query(
        r#"
        SELECT band_id, COUNT(*) as suggestion_count
        FROM song_suggestions WHERE suggested_by = ?
        GROUP BY band_id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.get("band_id"), row.get("suggestion_count")))
        .collect())
}

fn map_suggestion(row: &sqlx::sqlite::SqliteRow) -> SongSuggestion {
    SongSuggestion {
        id: row.get("id"),
        band_id: row.get("band_id"),
        suggested_by: row.get("suggested_by"),
        spotify_track_id: row.get("spotify_track_id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        album_art_url: row.get("album_art_url"),
        created_at: row.get("created_at"),
    }
}
