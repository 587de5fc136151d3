/// Rehearsal domain types
use crate::types::{BandId, RehearsalId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a rehearsal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RehearsalStatus {
    /// Upcoming, may still move
    Scheduled,
    /// Took place as planned
    Completed,
    /// Called off
    Cancelled,
}

impl RehearsalStatus {
    /// Convert status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            RehearsalStatus::Scheduled => "scheduled",
            RehearsalStatus::Completed => "completed",
            RehearsalStatus::Cancelled => "cancelled",
        }
    }

    /// Parse status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(RehearsalStatus::Scheduled),
            "completed" => Some(RehearsalStatus::Completed),
            "cancelled" => Some(RehearsalStatus::Cancelled),
            _ => None,
        }
    }
}

/// A scheduled band rehearsal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rehearsal {
    /// Unique rehearsal identifier
    pub id: RehearsalId,

    /// Band this rehearsal belongs to
    pub band_id: BandId,

    /// Calendar date, `YYYY-MM-DD`
    pub date: String,

    /// Start time `HH:MM` (24h); absent for all-day entries
    pub start_time: Option<String>,

    /// Free-form location
    pub location: Option<String>,

    /// Free-form notes
    pub description: Option<String>,

    /// Lifecycle status
    pub status: RehearsalStatus,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Rehearsal {
    /// Create a new scheduled rehearsal with a generated ID
    pub fn new(
        band_id: BandId,
        date: impl Into<String>,
        start_time: Option<String>,
        location: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: RehearsalId::generate(),
            band_id,
            date: date.into(),
            start_time,
            location,
            description,
            status: RehearsalStatus::Scheduled,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
