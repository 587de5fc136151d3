/// Song suggestion domain types
use crate::types::{BandId, SuggestionId, UserId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A song suggested for a band's repertoire
///
/// Catalog metadata (title, artist, album art) is snapshotted at suggestion
/// time so the list stays renderable without further upstream lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSuggestion {
    /// Unique suggestion identifier
    pub id: SuggestionId,

    /// Band this suggestion belongs to
    pub band_id: BandId,

    /// User who suggested the song
    pub suggested_by: UserId,

    /// Spotify track ID the metadata was taken from
    pub spotify_track_id: String,

    /// Track title
    pub title: String,

    /// Primary artist name(s)
    pub artist: String,

    /// Album title, if known
    pub album: Option<String>,

    /// Album art URL, if known
    pub album_art_url: Option<String>,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl SongSuggestion {
    /// Create a new suggestion with a generated ID
    pub fn new(
        band_id: BandId,
        suggested_by: UserId,
        spotify_track_id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: Option<String>,
        album_art_url: Option<String>,
    ) -> Self {
        Self {
            id: SuggestionId::generate(),
            band_id,
            suggested_by,
            spotify_track_id: spotify_track_id.into(),
            title: title.into(),
            artist: artist.into(),
            album,
            album_art_url,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Lowest accepted star rating
pub const MIN_STARS: u8 = 1;
/// Highest accepted star rating
pub const MAX_STARS: u8 = 5;

/// A member's star rating of a suggestion
///
/// One rating per (suggestion, user); re-rating replaces the stars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRating {
    /// Rated suggestion
    pub suggestion_id: SuggestionId,

    /// Rating user
    pub user_id: UserId,

    /// Stars, 1 through 5
    pub stars: u8,

    /// When the rating was last set (RFC 3339)
    pub rated_at: String,
}

impl SuggestionRating {
    /// Create a new rating; returns `None` if stars are out of range
    pub fn new(suggestion_id: SuggestionId, user_id: UserId, stars: u8) -> Option<Self> {
        if !(MIN_STARS..=MAX_STARS).contains(&stars) {
            return None;
        }
        Some(Self {
            suggestion_id,
            user_id,
            stars,
            rated_at: Utc::now().to_rfc3339(),
        })
    }
}
