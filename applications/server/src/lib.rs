/// Bandmate Server
///
/// HTTP backend for band rehearsal planning: accounts, bands with invite
/// codes, Spotify-backed song suggestions with star ratings, rehearsal
/// scheduling, and an iCalendar feed.
///
/// This library exposes the core components for testing purposes.
pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, avatars::AvatarStorage};
pub use state::AppState;
