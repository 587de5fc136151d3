/// Normalized catalog track type
use serde::{Deserialize, Serialize};

/// A track as returned by catalog lookups
///
/// This is a flattened projection of the upstream catalog's track object:
/// artists joined into one display string, the largest album image picked as
/// the art URL. Never persisted; suggestions snapshot the fields they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    /// Upstream track ID
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist names joined with `", "`
    pub artist: String,

    /// Album title
    pub album: String,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Largest album image URL, if the album has images
    pub album_art_url: Option<String>,

    /// 30-second preview clip URL, if available
    pub preview_url: Option<String>,

    /// Web player URL for the track
    pub external_url: String,

    /// Upstream popularity score, 0-100
    pub popularity: u32,
}
