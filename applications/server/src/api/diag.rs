/// Diagnostics endpoints for inspecting and repairing account data
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use bandmate_core::{Profile, UserId};
use bandmate_storage::{accounts, bands, profiles, suggestions};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /api/diag/status
///
/// Look up a user by ID or email and report their profile, memberships,
/// and per-band suggestion counts. When both identifiers are given the
/// ID wins.
pub async fn status(
    State(app_state): State<AppState>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Value>> {
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    let user_id = req
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    if email.is_none() && user_id.is_none() {
        return Err(ServerError::BadRequest(
            "Provide email or user_id".to_string(),
        ));
    }

    let mut profile = None;
    if let Some(id) = user_id {
        profile = profiles::get_by_user_id(&app_state.pool, &UserId::new(id)).await?;
    }
    if profile.is_none() {
        if let Some(email) = email {
            profile = profiles::get_by_email(&app_state.pool, &email.to_lowercase()).await?;
        }
    }

    let profile = profile.ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    let memberships = bands::get_user_memberships(&app_state.pool, &profile.user_id).await?;
    let user_bands = bands::get_user_bands(&app_state.pool, &profile.user_id).await?;
    let counts = suggestions::count_by_band_for_user(&app_state.pool, &profile.user_id).await?;

    let bands_json: Vec<Value> = user_bands
        .iter()
        .map(|(band, role)| {
            json!({
                "id": band.id,
                "name": band.name,
                "role": role,
            })
        })
        .collect();

    let mut song_counts = serde_json::Map::new();
    for (band_id, count) in counts {
        song_counts.insert(band_id.as_str().to_string(), json!(count));
    }

    Ok(Json(json!({
        "user_id": profile.user_id,
        "email": profile.email,
        "display_name": profile.display_name,
        "memberships": memberships,
        "bands": bands_json,
        "song_counts": song_counts,
    })))
}

/// POST /api/diag/fix-user-data
///
/// Recreate the caller's profile row if registration left it missing.
/// `has_profile` reports the state found before the repair.
pub async fn fix_user_data(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    let account = accounts::get_by_id(&app_state.pool, auth.user_id())
        .await?
        .ok_or_else(|| ServerError::NotFound("Account not found".to_string()))?;

    let mut profile = Profile::for_account(&account);
    if profile.display_name.trim().is_empty() {
        profile.display_name = profile
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string();
    }

    let created = profiles::create_if_missing(&app_state.pool, &profile).await?;

    let user_bands = bands::get_user_bands(&app_state.pool, auth.user_id()).await?;
    let bands_json: Vec<Value> = user_bands
        .iter()
        .map(|(band, role)| {
            json!({
                "id": band.id,
                "name": band.name,
                "role": role,
            })
        })
        .collect();
    let bands_count = bands_json.len();

    let recent = profiles::list_recent(&app_state.pool, 5).await?;
    let profiles_sample: Vec<Value> = recent
        .iter()
        .map(|p| {
            json!({
                "user_id": p.user_id,
                "email": p.email,
                "display_name": p.display_name,
            })
        })
        .collect();

    Ok(Json(json!({
        "user_id": account.id,
        "email": account.email,
        "has_profile": !created,
        "bands": bands_json,
        "bands_count": bands_count,
        "debug": {
            "profiles_sample": profiles_sample,
        },
    })))
}
