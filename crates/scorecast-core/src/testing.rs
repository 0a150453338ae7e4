//! Shared fixtures for unit tests.

#![allow(clippy::panic)]

use scorecast_types::{Match, MatchType};

use crate::setup::{MatchSetup, RosterEntry, TeamSetup};

fn roster(prefix: &str, count: usize) -> Vec<RosterEntry> {
    (1..=count)
        .map(|n| RosterEntry {
            id: format!("{prefix}{n}"),
            name: format!("Player {prefix}{n}"),
        })
        .collect()
}

/// A T20 setup: team `a` (players `a1..a11`, bowlers `ab1`, `ab2`) against
/// team `b` (players `b1..b11`, bowlers `bb1`, `bb2`).
pub fn sample_setup(id: &str) -> MatchSetup {
    MatchSetup {
        id: id.to_owned(),
        title: "A vs B".to_owned(),
        match_type: MatchType::T20,
        overs_limit: None,
        team1: TeamSetup {
            id: "a".to_owned(),
            name: "Team A".to_owned(),
            players: roster("a", 11),
            bowlers: roster("ab", 2),
        },
        team2: TeamSetup {
            id: "b".to_owned(),
            name: "Team B".to_owned(),
            players: roster("b", 11),
            bowlers: roster("bb", 2),
        },
    }
}

/// A fresh T20 match with id `m1`.
pub fn sample_match() -> Match {
    sample_match_with_id("m1")
}

/// A fresh T20 match with the given id.
pub fn sample_match_with_id(id: &str) -> Match {
    sample_setup(id)
        .into_match()
        .unwrap_or_else(|e| panic!("sample setup is invalid: {e}"))
}
