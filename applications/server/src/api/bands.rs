/// Bands API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use bandmate_core::{Band, BandMembership, MemberRole};
use bandmate_storage::bands;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateBandRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinBandRequest {
    #[serde(default)]
    pub invite_code: String,
}

#[derive(Debug, Serialize)]
pub struct BandWithRole {
    pub band: Band,
    pub role: MemberRole,
}

/// POST /api/bands
/// Create a band; the caller becomes its admin
pub async fn create_band(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateBandRequest>,
) -> Result<Json<Band>> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ServerError::BadRequest("Band name is required".to_string()));
    }

    let band = Band::new(auth.user_id().clone(), name);
    bands::create(&app_state.pool, &band).await?;
    Ok(Json(band))
}

/// GET /api/bands
/// All bands the caller belongs to, with their role in each
pub async fn list_bands(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<BandWithRole>>> {
    let rows = bands::get_user_bands(&app_state.pool, auth.user_id()).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(band, role)| BandWithRole { band, role })
            .collect(),
    ))
}

/// POST /api/bands/join
/// Join a band by invite code; joining a band you are already in is a no-op
pub async fn join_band(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<JoinBandRequest>,
) -> Result<Json<BandWithRole>> {
    let code = req.invite_code.trim().to_uppercase();
    if code.is_empty() {
        return Err(ServerError::BadRequest(
            "Invite code is required".to_string(),
        ));
    }

    let band = bands::get_by_invite_code(&app_state.pool, &code)
        .await?
        .ok_or_else(|| ServerError::NotFound("No band with that invite code".to_string()))?;

    // An existing membership row (and its role) is kept as-is
    bands::add_member(
        &app_state.pool,
        &BandMembership::new(band.id.clone(), auth.user_id().clone(), MemberRole::Member),
    )
    .await?;

    let role = bands::get_member_role(&app_state.pool, &band.id, auth.user_id())
        .await?
        .unwrap_or(MemberRole::Member);

    Ok(Json(BandWithRole { band, role }))
}
