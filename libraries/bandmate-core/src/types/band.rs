/// Band domain types
use crate::types::{BandId, UserId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of generated invite codes
const INVITE_CODE_LEN: usize = 8;

/// A band that members join and suggest songs for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// Unique band identifier
    pub id: BandId,

    /// Band name
    pub name: String,

    /// Short code other users redeem to join
    pub invite_code: String,

    /// User who created the band
    pub created_by: UserId,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Band {
    /// Create a new band with a generated ID and invite code
    pub fn new(created_by: UserId, name: impl Into<String>) -> Self {
        Self {
            id: BandId::generate(),
            name: name.into(),
            invite_code: generate_invite_code(),
            created_by,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Generate a short uppercase invite code
fn generate_invite_code() -> String {
    Uuid::new_v4().simple().to_string()[..INVITE_CODE_LEN].to_uppercase()
}

/// Role of a user inside a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Can schedule rehearsals and delete any suggestion
    Admin,
    /// Can suggest and rate songs
    Member,
}

impl MemberRole {
    /// Convert role to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }

    /// Parse role from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(MemberRole::Admin),
            "member" => Some(MemberRole::Member),
            _ => None,
        }
    }
}

/// Band membership record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandMembership {
    /// Band ID
    pub band_id: BandId,

    /// Member user ID
    pub user_id: UserId,

    /// Role inside the band
    pub role: MemberRole,

    /// When the user joined (RFC 3339)
    pub joined_at: String,
}

impl BandMembership {
    /// Create a new membership record
    pub fn new(band_id: BandId, user_id: UserId, role: MemberRole) -> Self {
        Self {
            band_id,
            user_id,
            role,
            joined_at: Utc::now().to_rfc3339(),
        }
    }
}
