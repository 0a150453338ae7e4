//! `WebSocket` message protocol.
//!
//! Every frame is a JSON object tagged by `type`. Clients subscribe to
//! matches and submit score updates; the server pushes snapshots.
//!
//! | Direction | `type` | Purpose |
//! |-----------|--------|---------|
//! | client | `subscribe` | Follow a match, answered with `snapshot` |
//! | client | `unsubscribe` | Stop following a match |
//! | client | `score_update` | Submit a partial update, answered with `ack` |
//! | client | `striker_change` | Put a batter on strike |
//! | client | `bowler_change` | Bring a bowler on |
//! | client | `status_change` | Move the match to a new status |
//! | server | `snapshot` | Current state of a newly followed match |
//! | server | `unsubscribed` | Confirms `unsubscribe` |
//! | server | `ack` | The sender's update was committed |
//! | server | `match_update` | A subscribed match changed |
//! | server | `error` | A request failed |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use scorecast_core::RelayError;
use scorecast_types::{
    BowlerId, Match, MatchId, MatchStatus, PlayerId, RawUpdate, RejectionReason,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A frame sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start receiving updates for a match.
    Subscribe {
        /// Match to follow.
        match_id: MatchId,
    },
    /// Stop receiving updates for a match.
    Unsubscribe {
        /// Match to stop following.
        match_id: MatchId,
    },
    /// Submit a partial score update.
    ScoreUpdate {
        /// Match being scored.
        match_id: MatchId,
        /// What changed on this delivery.
        update: RawUpdate,
    },
    /// Put a batter on strike.
    StrikerChange {
        /// Match being scored.
        match_id: MatchId,
        /// New striker.
        player_id: PlayerId,
    },
    /// Bring a bowler into the attack.
    BowlerChange {
        /// Match being scored.
        match_id: MatchId,
        /// New current bowler.
        bowler_id: BowlerId,
    },
    /// Start, finish, or abandon a match.
    StatusChange {
        /// Match being scored.
        match_id: MatchId,
        /// New status.
        status: MatchStatus,
    },
}

impl ClientMessage {
    /// The match the message refers to.
    pub const fn match_id(&self) -> &MatchId {
        match self {
            Self::Subscribe { match_id }
            | Self::Unsubscribe { match_id }
            | Self::ScoreUpdate { match_id, .. }
            | Self::StrikerChange { match_id, .. }
            | Self::BowlerChange { match_id, .. }
            | Self::StatusChange { match_id, .. } => match_id,
        }
    }
}

/// What went wrong with a client request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The frame was not valid protocol JSON.
    InvalidMessage,
    /// The referenced match does not exist.
    NotFound,
    /// The update failed validation.
    Rejected,
    /// A match with this id already exists.
    AlreadyExists,
    /// A match setup was invalid.
    InvalidSetup,
}

/// A frame sent by the server.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A subscribed match has a new snapshot.
    MatchUpdate {
        /// Match that changed.
        match_id: MatchId,
        /// Revision of `snapshot`.
        revision: u64,
        /// When the gateway queued the message.
        sent_at: DateTime<Utc>,
        /// The full new snapshot.
        #[serde(rename = "match")]
        snapshot: Arc<Match>,
    },
    /// The current snapshot, sent in reply to `subscribe`.
    Snapshot {
        /// Subscribed match.
        match_id: MatchId,
        /// Revision of `snapshot`.
        revision: u64,
        /// The current snapshot.
        #[serde(rename = "match")]
        snapshot: Arc<Match>,
    },
    /// The subscription was dropped.
    Unsubscribed {
        /// Match no longer followed.
        match_id: MatchId,
    },
    /// The sender's update was committed.
    Ack {
        /// Match that changed.
        match_id: MatchId,
        /// Revision produced by the update.
        revision: u64,
        /// The committed snapshot.
        #[serde(rename = "match")]
        snapshot: Arc<Match>,
    },
    /// A request failed. Nothing changed.
    Error {
        /// Match the failed request referred to, when known.
        match_id: Option<MatchId>,
        /// Failure category.
        kind: ErrorKind,
        /// Validation failure category, for rejected updates.
        reason: Option<RejectionReason>,
        /// Human-readable description.
        message: String,
    },
}

impl ServerMessage {
    /// A broadcast of a freshly committed snapshot.
    pub fn match_update(snapshot: Arc<Match>) -> Self {
        Self::MatchUpdate {
            match_id: snapshot.id.clone(),
            revision: snapshot.revision,
            sent_at: Utc::now(),
            snapshot,
        }
    }

    /// The reply to a failed request.
    pub fn from_relay_error(match_id: Option<MatchId>, error: &RelayError) -> Self {
        let (kind, reason) = match error {
            RelayError::Store(scorecast_core::StoreError::NotFound(_)) => (ErrorKind::NotFound, None),
            RelayError::Store(scorecast_core::StoreError::AlreadyExists(_)) => {
                (ErrorKind::AlreadyExists, None)
            }
            RelayError::Rejected(e) => (ErrorKind::Rejected, Some(e.reason)),
            RelayError::Setup(_) => (ErrorKind::InvalidSetup, None),
            RelayError::InvalidQuery(_) => (ErrorKind::InvalidMessage, None),
        };
        Self::Error {
            match_id,
            kind,
            reason,
            message: error.to_string(),
        }
    }

    /// The reply to a frame that could not be parsed.
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::Error {
            match_id: None,
            kind: ErrorKind::InvalidMessage,
            reason: None,
            message: message.into(),
        }
    }
}
