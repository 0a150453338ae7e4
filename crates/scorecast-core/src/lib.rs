//! Live match state for the Scorecast relay.
//!
//! Scorers submit partial updates for a match; the relay validates each one
//! against the authoritative snapshot, derives the next snapshot, commits
//! it, and fans it out to every connection watching that match.
//!
//! # Modules
//!
//! - [`store`] -- Authoritative in-memory arena of live matches
//! - [`validation`] -- Checks a raw update against the current snapshot
//! - [`apply`] -- Pure computation of the next snapshot
//! - [`stats`] -- Strike rate, economy, run rates, partnership
//! - [`subscription`] -- Which connections follow which matches
//! - [`dispatch`] -- Best-effort fan-out through the [`Outbound`] seam
//! - [`relay`] -- The operations exposed to the connection gateway
//! - [`query`] -- Status filter and pagination for match listings
//! - [`setup`] -- Building a fresh match from a roster description
//! - [`config`] -- Layered configuration
//! - [`error`] -- Error types

pub mod apply;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod query;
pub mod relay;
pub mod setup;
pub mod stats;
pub mod store;
pub mod subscription;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, LogFormat, ScorecastConfig};
pub use dispatch::{BroadcastDispatcher, DispatchReport, Outbound};
pub use error::{DeliveryError, RelayError, SetupError, StoreError, ValidationError};
pub use query::{MatchPage, MatchQuery};
pub use relay::ScoreRelay;
pub use setup::{MatchSetup, RosterEntry, TeamSetup};
pub use store::MatchStore;
pub use subscription::SubscriptionRegistry;
pub use validation::{ValidatedUpdate, validate};
