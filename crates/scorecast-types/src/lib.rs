//! Shared type definitions for the Scorecast live score relay.
//!
//! This crate is the single source of truth for the match snapshot and the
//! score update payload. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the scorer dashboard and broadcast overlay.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for match, team, player, bowler, and
//!   connection identifiers
//! - [`enums`] -- Match format, status, innings, delivery classification,
//!   rejection reasons
//! - [`structs`] -- Players, bowlers, extras, teams, the match snapshot, summaries
//! - [`update`] -- The partial score update submitted by scorers

pub mod enums;
pub mod ids;
pub mod structs;
pub mod update;

// Re-export all public types at crate root for convenience.
pub use enums::{DeliveryKind, Innings, MatchStatus, MatchType, RejectionReason, TeamSide};
pub use ids::{BowlerId, ConnectionId, MatchId, PlayerId, TeamId};
pub use structs::{
    BALLS_PER_OVER, Bowler, Extras, MAX_WICKETS, Match, MatchSummary, Overs, Partnership,
    PartnershipStart, Player, Team, TeamSummary,
};
pub use update::RawUpdate;
