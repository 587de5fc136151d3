//! Bandmate Catalog
//!
//! Spotify Web API client for Bandmate.
//!
//! Uses the Client Credentials flow for server-to-server authentication and
//! caches the resulting token until shortly before it expires. Search and
//! single-track lookups come back as the normalized
//! [`TrackRecord`](bandmate_core::types::TrackRecord) the rest of the
//! service works with.
//!
//! # Example
//!
//! ```ignore
//! use bandmate_catalog::{CatalogClient, CatalogConfig};
//!
//! let client = CatalogClient::new(CatalogConfig::new(client_id, client_secret))?;
//! let tracks = client.search_tracks("karma police", None).await?;
//! let track = client.get_track(&tracks[0].id).await?;
//! ```

#![forbid(unsafe_code)]

mod client;
mod error;
mod types;

pub use client::{CatalogClient, CatalogConfig};
pub use error::{CatalogError, Result};
