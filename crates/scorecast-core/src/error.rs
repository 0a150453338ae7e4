//! Error types for the scorecast-core crate.
//!
//! No error raised here is fatal to the process. Each one is scoped to a
//! single request or a single connection and is either surfaced to the
//! caller ([`StoreError`], [`ValidationError`], [`RelayError`]) or
//! swallowed per target ([`DeliveryError`]).

use scorecast_types::{ConnectionId, MatchId, RejectionReason};

/// Errors from the match store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No live match has this id.
    #[error("match not found: {0}")]
    NotFound(MatchId),

    /// A live match already uses this id.
    #[error("match already exists: {0}")]
    AlreadyExists(MatchId),
}

/// A score update refused by the validator. The match is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}: {detail}")]
pub struct ValidationError {
    /// Which check failed.
    pub reason: RejectionReason,
    /// Human-readable description of the offending field.
    pub detail: String,
}

impl ValidationError {
    /// Build a rejection with the given reason and detail.
    pub fn new(reason: RejectionReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

/// Failure to hand a broadcast to one connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The connection is not registered with the gateway.
    #[error("unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    /// The connection's outbound channel has been closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(ConnectionId),

    /// The connection's outbound queue is full; this snapshot is skipped.
    #[error("connection lagging: {0}")]
    Lagging(ConnectionId),
}

/// A match setup that cannot be turned into a live match.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Field-level validation failed.
    #[error("invalid match setup: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// Two entries in one roster, or the two teams, share an id.
    #[error("duplicate id in {scope}: {id}")]
    DuplicateId {
        /// Where the duplicate was found, e.g. `"team1 players"`.
        scope: String,
        /// The repeated id.
        id: String,
    },

    /// An overs limit was given for an unlimited format.
    #[error("overs limit is not allowed for unlimited matches")]
    OversLimitNotAllowed,
}

/// Errors surfaced by the relay to the connection gateway.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The match store refused the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The update failed validation.
    #[error("update rejected: {0}")]
    Rejected(#[from] ValidationError),

    /// A new match could not be built from its setup.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// A match listing query is out of range.
    #[error("invalid match query: {0}")]
    InvalidQuery(#[from] validator::ValidationErrors),
}
