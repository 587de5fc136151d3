/// Account and profile domain types
use crate::types::UserId;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Registered user account
///
/// The password hash is deliberately not part of this type; it stays in the
/// storage layer and is only surfaced by the dedicated credentials query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique user identifier
    pub id: UserId,

    /// Login email (unique, stored lowercase)
    pub email: String,

    /// Name shown to other band members
    pub display_name: String,

    /// Account creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Account {
    /// Create a new account with a generated ID
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            display_name: display_name.into(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Public profile row backing the account
///
/// Profiles are created alongside accounts, but older data sets can miss
/// them; the repair endpoint recreates absent rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user ID
    pub user_id: UserId,

    /// Email copied from the account
    pub email: String,

    /// Display name copied from the account
    pub display_name: String,

    /// Public URL of the uploaded avatar, if any
    pub avatar_url: Option<String>,

    /// Profile creation timestamp (RFC 3339)
    pub created_at: String,

    /// Last modification timestamp (RFC 3339)
    pub updated_at: String,
}

impl Profile {
    /// Create a profile for an account, without an avatar
    pub fn for_account(account: &Account) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            user_id: account.id.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            avatar_url: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
