/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use bandmate_core::{Account, Profile};
use bandmate_storage::{accounts, profiles};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ServerError::BadRequest(
            "A valid email is required".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(ServerError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // Fall back to the email's local part when no display name was given
    let display_name = req.display_name.trim();
    let display_name = if display_name.is_empty() {
        email.split('@').next().unwrap_or_default().to_string()
    } else {
        display_name.to_string()
    };

    let password_hash = app_state.auth_service.hash_password(&req.password)?;

    let account = Account::new(email, display_name);
    accounts::create(&app_state.pool, &account, &password_hash).await?;
    profiles::create(&app_state.pool, &Profile::for_account(&account)).await?;

    let token = app_state.auth_service.create_token(&account.id)?;
    Ok(Json(AuthResponse {
        token,
        user_id: account.id.to_string(),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = req.email.trim().to_lowercase();

    let account = accounts::get_by_email(&app_state.pool, &email)
        .await?
        .ok_or_else(|| ServerError::Auth("Invalid email or password".to_string()))?;

    let password_hash = accounts::get_password_hash(&app_state.pool, &account.id)
        .await?
        .ok_or_else(|| ServerError::Auth("Invalid email or password".to_string()))?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &password_hash)?
    {
        return Err(ServerError::Auth("Invalid email or password".to_string()));
    }

    let token = app_state.auth_service.create_token(&account.id)?;
    Ok(Json(AuthResponse {
        token,
        user_id: account.id.to_string(),
    }))
}
