/// Song suggestion API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use bandmate_core::{BandId, MemberRole, SongSuggestion, SuggestionId, SuggestionRating};
use bandmate_storage::{bands, suggestions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SuggestTrackRequest {
    #[serde(default)]
    pub band_id: String,
    #[serde(default)]
    pub track_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListSuggestionsRequest {
    #[serde(default)]
    pub band_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RateSuggestionRequest {
    #[serde(default)]
    pub suggestion_id: String,
    pub stars: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSuggestionRequest {
    #[serde(default)]
    pub song_id: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionWithVotes {
    pub suggestion: SongSuggestion,
    pub average_stars: Option<f64>,
    pub ratings_count: i64,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<SuggestionWithVotes>,
}

#[derive(Debug, Serialize)]
pub struct RatingSummaryResponse {
    pub average_stars: Option<f64>,
    pub ratings_count: i64,
}

/// POST /api/suggestions
/// Suggest a track to the band, snapshotting its catalog metadata
pub async fn suggest_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<SuggestTrackRequest>,
) -> Result<Json<SongSuggestion>> {
    let track_id = req.track_id.trim();
    if req.band_id.trim().is_empty() || track_id.is_empty() {
        return Err(ServerError::BadRequest(
            "band_id and track_id are required".to_string(),
        ));
    }

    let band_id = BandId::new(req.band_id.trim());
    super::require_member(&app_state.pool, &band_id, auth.user_id()).await?;

    let track = app_state.catalog.get_track(track_id).await?;
    let album = if track.album.is_empty() {
        None
    } else {
        Some(track.album)
    };

    let suggestion = SongSuggestion::new(
        band_id,
        auth.user_id().clone(),
        track.id,
        track.title,
        track.artist,
        album,
        track.album_art_url,
    );
    suggestions::create(&app_state.pool, &suggestion).await?;

    Ok(Json(suggestion))
}

/// POST /api/suggestions/list
/// The band's suggestions, newest first, with rating aggregates
pub async fn list_suggestions(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ListSuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>> {
    if req.band_id.trim().is_empty() {
        return Err(ServerError::BadRequest("band_id is required".to_string()));
    }

    let band_id = BandId::new(req.band_id.trim());
    super::require_member(&app_state.pool, &band_id, auth.user_id()).await?;

    let rows = suggestions::list_for_band(&app_state.pool, &band_id).await?;
    Ok(Json(SuggestionsResponse {
        suggestions: rows
            .into_iter()
            .map(|row| SuggestionWithVotes {
                suggestion: row.suggestion,
                average_stars: row.average_stars,
                ratings_count: row.ratings_count,
            })
            .collect(),
    }))
}

/// POST /api/suggestions/rate
/// Star a suggestion; re-rating replaces the previous stars
pub async fn rate_suggestion(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<RateSuggestionRequest>,
) -> Result<Json<RatingSummaryResponse>> {
    if req.suggestion_id.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "suggestion_id is required".to_string(),
        ));
    }

    let invalid_stars = || ServerError::BadRequest("Stars must be between 1 and 5".to_string());
    let stars = u8::try_from(req.stars).map_err(|_| invalid_stars())?;
    let suggestion_id = SuggestionId::new(req.suggestion_id.trim());
    let rating = SuggestionRating::new(suggestion_id.clone(), auth.user_id().clone(), stars)
        .ok_or_else(invalid_stars)?;

    let suggestion = suggestions::get_by_id(&app_state.pool, &suggestion_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Suggestion not found".to_string()))?;
    super::require_member(&app_state.pool, &suggestion.band_id, auth.user_id()).await?;

    suggestions::rate(&app_state.pool, &rating).await?;

    let (average_stars, ratings_count) =
        suggestions::rating_summary(&app_state.pool, &suggestion_id).await?;
    Ok(Json(RatingSummaryResponse {
        average_stars,
        ratings_count,
    }))
}

/// POST /api/suggestions/delete
///
/// Allowed for the original suggester or a band admin. Lookup, authorize,
/// delete; a concurrent delete between those steps is harmless because the
/// final DELETE then matches zero rows.
pub async fn delete_suggestion(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<DeleteSuggestionRequest>,
) -> Result<Json<serde_json::Value>> {
    let song_id = req.song_id.trim();
    if song_id.is_empty() {
        return Err(ServerError::BadRequest("Missing song_id".to_string()));
    }

    let suggestion_id = SuggestionId::new(song_id);
    let suggestion = suggestions::get_by_id(&app_state.pool, &suggestion_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Suggestion not found".to_string()))?;

    if suggestion.suggested_by != *auth.user_id() {
        let role =
            bands::get_member_role(&app_state.pool, &suggestion.band_id, auth.user_id()).await?;
        if role != Some(MemberRole::Admin) {
            return Err(ServerError::Unauthorized(
                "Only the suggester or a band admin can delete a suggestion".to_string(),
            ));
        }
    }

    suggestions::delete(&app_state.pool, &suggestion_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
