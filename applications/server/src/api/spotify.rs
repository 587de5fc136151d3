/// Spotify lookup API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use bandmate_core::TrackRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub tracks: Vec<TrackRecord>,
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(rename = "trackId", default)]
    pub track_id: String,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub track: TrackRecord,
}

/// POST /api/spotify/search
/// Search the catalog; an empty query is rejected before any upstream call
pub async fn search(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let tracks = app_state.catalog.search_tracks(&req.query, req.limit).await?;
    Ok(Json(SearchResponse { tracks }))
}

/// POST /api/spotify/track
/// Look up one track by its catalog ID
pub async fn get_track(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Json(req): Json<TrackRequest>,
) -> Result<Json<TrackResponse>> {
    let track_id = req.track_id.trim();
    if track_id.is_empty() {
        return Err(ServerError::BadRequest("Missing trackId".to_string()));
    }

    let track = app_state.catalog.get_track(track_id).await?;
    Ok(Json(TrackResponse { track }))
}
