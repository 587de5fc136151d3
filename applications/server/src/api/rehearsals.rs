/// Rehearsals API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use bandmate_core::{BandId, MemberRole, Rehearsal, RehearsalId, RehearsalStatus};
use bandmate_storage::rehearsals;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateRehearsalRequest {
    #[serde(default)]
    pub band_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListRehearsalsRequest {
    #[serde(default)]
    pub band_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub rehearsal_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RehearsalsResponse {
    pub rehearsals: Vec<Rehearsal>,
}

/// POST /api/rehearsals
/// Schedule a rehearsal; band admins only
pub async fn create_rehearsal(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateRehearsalRequest>,
) -> Result<Json<Rehearsal>> {
    if req.band_id.trim().is_empty() {
        return Err(ServerError::BadRequest("band_id is required".to_string()));
    }

    let band_id = BandId::new(req.band_id.trim());
    let role = super::require_member(&app_state.pool, &band_id, auth.user_id()).await?;
    if role != MemberRole::Admin {
        return Err(ServerError::Unauthorized(
            "Only band admins can schedule rehearsals".to_string(),
        ));
    }

    if NaiveDate::parse_from_str(req.date.trim(), "%Y-%m-%d").is_err() {
        return Err(ServerError::BadRequest(
            "Date must be YYYY-MM-DD".to_string(),
        ));
    }

    let start_time = match req.start_time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(t) => {
            if NaiveTime::parse_from_str(t, "%H:%M").is_err() {
                return Err(ServerError::BadRequest(
                    "Start time must be HH:MM".to_string(),
                ));
            }
            Some(t.to_string())
        }
    };

    let rehearsal = Rehearsal::new(
        band_id,
        req.date.trim(),
        start_time,
        req.location,
        req.description,
    );
    rehearsals::create(&app_state.pool, &rehearsal).await?;

    Ok(Json(rehearsal))
}

/// POST /api/rehearsals/list
/// The band's rehearsals, ascending by date; members only
pub async fn list_rehearsals(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ListRehearsalsRequest>,
) -> Result<Json<RehearsalsResponse>> {
    if req.band_id.trim().is_empty() {
        return Err(ServerError::BadRequest("band_id is required".to_string()));
    }

    let band_id = BandId::new(req.band_id.trim());
    super::require_member(&app_state.pool, &band_id, auth.user_id()).await?;

    let rehearsals = rehearsals::list_for_band(&app_state.pool, &band_id).await?;
    Ok(Json(RehearsalsResponse { rehearsals }))
}

/// POST /api/rehearsals/status
/// Move a rehearsal through its lifecycle; band admins only
pub async fn update_status(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.rehearsal_id.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "rehearsal_id is required".to_string(),
        ));
    }

    let status = RehearsalStatus::from_str(req.status.trim()).ok_or_else(|| {
        ServerError::BadRequest("Status must be scheduled, completed, or cancelled".to_string())
    })?;

    let rehearsal_id = RehearsalId::new(req.rehearsal_id.trim());
    let rehearsal = rehearsals::get_by_id(&app_state.pool, &rehearsal_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Rehearsal not found".to_string()))?;

    let role = super::require_member(&app_state.pool, &rehearsal.band_id, auth.user_id()).await?;
    if role != MemberRole::Admin {
        return Err(ServerError::Unauthorized(
            "Only band admins can update rehearsal status".to_string(),
        ));
    }

    rehearsals::update_status(&app_state.pool, &rehearsal_id, status).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
