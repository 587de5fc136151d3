//! Upstream response types and their normalization.
//!
//! The structs here mirror the subset of the Spotify Web API track object
//! that Bandmate consumes. Everything beyond `id` and `name` is defaulted so
//! that partial upstream payloads never fail deserialization.

use bandmate_core::types::TrackRecord;
use serde::Deserialize;

#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: TracksPage,
}

#[derive(Deserialize)]
pub(crate) struct TracksPage {
    pub items: Vec<ApiTrack>,
}

/// A track as the upstream catalog returns it (simplified).
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ApiTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
    #[serde(default)]
    pub album: ApiAlbum,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub(crate) struct ApiArtist {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub(crate) struct ApiAlbum {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub(crate) struct ApiImage {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub(crate) struct ExternalUrls {
    pub spotify: Option<String>,
}

impl ApiTrack {
    /// Flatten the upstream shape into the record the rest of the service
    /// consumes: artists joined into one string, the largest album image
    /// picked as art, and a fallback web URL when the upstream omits one.
    pub(crate) fn into_record(self) -> TrackRecord {
        let artist = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let album_art_url = self
            .album
            .images
            .iter()
            .max_by_key(|img| u64::from(img.width.unwrap_or(0)) * u64::from(img.height.unwrap_or(0)))
            .and_then(|img| img.url.clone());

        let external_url = self
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", self.id));

        TrackRecord {
            id: self.id,
            title: self.name,
            artist,
            album: self.album.name,
            duration_ms: self.duration_ms,
            album_art_url,
            preview_url: self.preview_url,
            external_url,
            popularity: self.popularity,
        }
    }
}
