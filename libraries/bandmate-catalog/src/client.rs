//! Catalog client with client-credentials token caching.

use crate::error::{CatalogError, Result};
use crate::types::{ApiTrack, SearchResponse, TokenResponse};
use bandmate_core::types::TrackRecord;
use base64::Engine;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Seconds shaved off the reported token lifetime so a token is never used
/// right at its expiry edge.
const EXPIRY_MARGIN_SECS: u64 = 60;

const DEFAULT_SEARCH_LIMIT: u32 = 20;
const MAX_SEARCH_LIMIT: u32 = 50;

/// Configuration for [`CatalogClient`].
///
/// The URLs default to the real Spotify endpoints; tests point them at a
/// local mock server.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Token endpoint URL
    pub token_url: String,
    /// API base URL (no trailing slash)
    pub api_base_url: String,
}

impl CatalogConfig {
    /// Config with the production endpoints
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Catalog API client with token caching.
///
/// Holds one client-credentials token behind an `RwLock`; the lock is never
/// held across a network call, so two tasks that both see an expired token
/// will both refresh and the last writer wins. That duplicate exchange is
/// harmless and cheaper than serializing every request behind a refresh.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    config: Arc<CatalogConfig>,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl CatalogClient {
    /// Create a new client.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let api_base_url = config.api_base_url.trim_end_matches('/').to_string();

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Bandmate/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CatalogError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(CatalogConfig {
                api_base_url,
                ..config
            }),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Search the catalog for tracks.
    ///
    /// `limit` defaults to 20 and is clamped to 1..=50. An empty (or
    /// whitespace-only) query fails before any upstream call.
    pub async fn search_tracks(&self, query: &str, limit: Option<u32>) -> Result<Vec<TrackRecord>> {
        if query.trim().is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT);
        let token = self.ensure_token().await?;
        let url = format!("{}/search", self.config.api_base_url);

        debug!(query = %query, limit, "searching catalog");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("limit", &limit.to_string()),
            ])
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("search response: {e}")))?;

        Ok(body
            .tracks
            .items
            .into_iter()
            .map(ApiTrack::into_record)
            .collect())
    }

    /// Fetch one track by its upstream ID.
    ///
    /// An empty ID fails before any upstream call.
    pub async fn get_track(&self, track_id: &str) -> Result<TrackRecord> {
        if track_id.trim().is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        let token = self.ensure_token().await?;
        let url = format!("{}/tracks/{}", self.config.api_base_url, track_id);

        debug!(track_id = %track_id, "fetching catalog track");

        let response = self.http.get(&url).bearer_auth(&token).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::TrackNotFound(track_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let track: ApiTrack = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("track response: {e}")))?;

        Ok(track.into_record())
    }

    /// Return a valid access token, exchanging credentials if the cached one
    /// is absent or past its (margin-adjusted) expiry.
    async fn ensure_token(&self) -> Result<String> {
        {
            let guard = self.token.read().await;
            if let Some(ref t) = *guard {
                if t.expires_at > Instant::now() {
                    return Ok(t.access_token.clone());
                }
            }
        }

        // Exchange outside the lock; overlapping refreshes overwrite each
        // other, which is fine.
        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *self.token.write().await = Some(token);

        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            return Err(CatalogError::MissingCredentials);
        }

        debug!("exchanging client credentials for access token");

        let auth = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        ));

        let response = self
            .http
            .post(&self.config.token_url)
            .header("Authorization", format!("Basic {auth}"))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "token exchange rejected");
            return Err(CatalogError::AuthRejected(format!("{status}: {body}")));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("token response: {e}")))?;

        Ok(CachedToken {
            access_token: body.access_token,
            expires_at: Instant::now()
                + Duration::from_secs(body.expires_in.saturating_sub(EXPIRY_MARGIN_SECS)),
        })
    }
}

async fn upstream_error(response: reqwest::Response) -> CatalogError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    warn!(status, "catalog request failed");
    CatalogError::Upstream { status, message }
}
