//! Bandmate Core
//!
//! Shared domain types for the Bandmate rehearsal coordination service.
//!
//! This crate provides the foundational building blocks used by the storage
//! layer, the catalog client, and the server application.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Identifiers**: string-backed newtypes (`UserId`, `BandId`, ...)
//! - **Domain Types**: `Account`, `Band`, `SongSuggestion`, `Rehearsal`, etc.
//! - **Catalog Types**: the normalized `TrackRecord` returned by catalog lookups
//!
//! # Example
//!
//! ```rust
//! use bandmate_core::types::{Band, MemberRole, UserId};
//!
//! // Create a band; the founder becomes its first admin
//! let founder = UserId::generate();
//! let band = Band::new(founder.clone(), "Garage Collective");
//!
//! assert_eq!(band.created_by, founder);
//! assert_eq!(MemberRole::Admin.as_str(), "admin");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod types;

// Export all types
pub use types::{
    // Identifiers
    BandId, RehearsalId, SuggestionId, UserId,
    // Accounts and profiles
    Account, Profile,
    // Bands
    Band, BandMembership, MemberRole,
    // Suggestions and ratings
    SongSuggestion, SuggestionRating, MAX_STARS, MIN_STARS,
    // Rehearsals
    Rehearsal, RehearsalStatus,
    // Catalog
    TrackRecord,
};
