/// API route modules
pub mod auth;
pub mod bands;
pub mod calendar;
pub mod diag;
pub mod health;
pub mod profile;
pub mod rehearsals;
pub mod spotify;
pub mod suggestions;

use crate::error::{Result, ServerError};
use bandmate_core::{BandId, MemberRole, UserId};
use sqlx::SqlitePool;

/// Resolve the caller's role in a band; non-members get a 403
pub(crate) async fn require_member(
    pool: &SqlitePool,
    band_id: &BandId,
    user_id: &UserId,
) -> Result<MemberRole> {
    bandmate_storage::bands::get_member_role(pool, band_id, user_id)
        .await?
        .ok_or_else(|| ServerError::Unauthorized("You are not a member of this band".to_string()))
}
