//! Domain types for Bandmate

mod account;
mod band;
mod ids;
mod rehearsal;
mod suggestion;
mod track;

pub use account::{Account, Profile};
pub use band::{Band, BandMembership, MemberRole};
pub use ids::{BandId, RehearsalId, SuggestionId, UserId};
pub use rehearsal::{Rehearsal, RehearsalStatus};
pub use suggestion::{SongSuggestion, SuggestionRating, MAX_STARS, MIN_STARS};
pub use track::TrackRecord;
