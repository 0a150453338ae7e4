//! Match setup: building a fresh live match from event configuration.
//!
//! A [`MatchSetup`] arrives from the HTTP API or the seed section of the
//! config file. Field-level rules are declared with `validator`; the
//! cross-field rules (unique ids, overs limit vs. format) are checked in
//! [`MatchSetup::into_match`].

use std::collections::HashSet;

use scorecast_types::{
    Bowler, BowlerId, Innings, Match, MatchId, MatchStatus, MatchType, Partnership,
    PartnershipStart, Player, PlayerId, Team, TeamId,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::SetupError;
use crate::stats;

/// One player or bowler in a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RosterEntry {
    /// Identifier, unique within its roster.
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    /// Display name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

/// A team and its rosters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TeamSetup {
    /// Team identifier.
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    /// Team name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Batting order.
    #[validate(length(min = 2, max = 15), nested)]
    pub players: Vec<RosterEntry>,
    /// Bowlers available to this team.
    #[validate(length(min = 1, max = 15), nested)]
    pub bowlers: Vec<RosterEntry>,
}

/// Everything needed to open a match for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MatchSetup {
    /// Match identifier.
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    /// Display title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Match format.
    pub match_type: MatchType,
    /// Overrides the format's default overs per innings.
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub overs_limit: Option<u32>,
    /// Team batting first.
    #[validate(nested)]
    pub team1: TeamSetup,
    /// Team batting second.
    #[validate(nested)]
    pub team2: TeamSetup,
}

impl MatchSetup {
    /// Validate the setup and build the match at innings one with every
    /// counter at zero.
    pub fn into_match(self) -> Result<Match, SetupError> {
        self.validate()?;

        if self.team1.id == self.team2.id {
            return Err(SetupError::DuplicateId {
                scope: "teams".to_owned(),
                id: self.team1.id,
            });
        }
        for (label, team) in [("team1", &self.team1), ("team2", &self.team2)] {
            ensure_unique(&format!("{label} players"), &team.players)?;
            ensure_unique(&format!("{label} bowlers"), &team.bowlers)?;
        }

        let overs_limit = match (self.match_type.default_overs_limit(), self.overs_limit) {
            (None, Some(_)) => return Err(SetupError::OversLimitNotAllowed),
            (Some(_), Some(limit)) => Some(limit),
            (default, None) => default,
        };

        let mut snapshot = Match {
            id: MatchId::new(self.id),
            title: self.title,
            match_type: self.match_type,
            status: MatchStatus::Upcoming,
            overs_limit,
            team1: build_team(self.team1),
            team2: build_team(self.team2),
            current_innings: Innings::First,
            target: None,
            required_run_rate: None,
            last_ball: None,
            current_over: Vec::new(),
            current_over_runs: 0,
            partnership: Partnership::default(),
            partnership_start: PartnershipStart::default(),
            revision: 0,
        };
        stats::refresh(&mut snapshot);
        Ok(snapshot)
    }
}

fn ensure_unique(scope: &str, entries: &[RosterEntry]) -> Result<(), SetupError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(SetupError::DuplicateId {
                scope: scope.to_owned(),
                id: entry.id.clone(),
            });
        }
    }
    Ok(())
}

fn build_team(setup: TeamSetup) -> Team {
    let players = setup
        .players
        .into_iter()
        .map(|p| Player::new(PlayerId::new(p.id), p.name))
        .collect();
    let bowlers = setup
        .bowlers
        .into_iter()
        .map(|b| Bowler::new(BowlerId::new(b.id), b.name))
        .collect();
    Team::new(TeamId::new(setup.id), setup.name, players, bowlers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::testing::sample_setup;

    #[test]
    fn builds_a_fresh_match() {
        let m = sample_setup("final").into_match().unwrap();
        assert_eq!(m.id, MatchId::new("final"));
        assert_eq!(m.overs_limit, Some(20));
        assert_eq!(m.current_innings, Innings::First);
        assert_eq!(m.team1.players.len(), 11);
        assert_eq!(m.team2.bowlers.len(), 2);
        assert_eq!(m.revision, 0);
        assert!(m.target.is_none());
    }

    #[test]
    fn overs_limit_override_for_limited_formats() {
        let mut setup = sample_setup("m");
        setup.overs_limit = Some(15);
        assert_eq!(setup.into_match().unwrap().overs_limit, Some(15));
    }

    #[test]
    fn test_matches_have_no_overs_limit() {
        let mut setup = sample_setup("m");
        setup.match_type = MatchType::Test;
        assert_eq!(setup.clone().into_match().unwrap().overs_limit, None);

        setup.overs_limit = Some(90);
        assert!(matches!(
            setup.into_match(),
            Err(SetupError::OversLimitNotAllowed)
        ));
    }

    #[test]
    fn duplicate_player_ids_are_rejected() {
        let mut setup = sample_setup("m");
        setup.team1.players[1].id = "a1".to_owned();
        let err = setup.into_match().err();
        assert!(matches!(
            err,
            Some(SetupError::DuplicateId { ref scope, ref id }) if scope == "team1 players" && id == "a1"
        ));
    }

    #[test]
    fn same_team_twice_is_rejected() {
        let mut setup = sample_setup("m");
        setup.team2.id = "a".to_owned();
        assert!(matches!(
            setup.into_match(),
            Err(SetupError::DuplicateId { .. })
        ));
    }

    #[test]
    fn empty_names_fail_field_validation() {
        let mut setup = sample_setup("m");
        setup.title = String::new();
        setup.team2.bowlers.clear();
        let err = setup.into_match().err();
        assert!(matches!(err, Some(SetupError::Invalid(_))));
    }

    #[test]
    fn parses_from_json() {
        let json = r#"{
            "id": "m9",
            "title": "X vs Y",
            "match_type": "T10",
            "team1": {"id": "x", "name": "X",
                      "players": [{"id": "x1", "name": "One"}, {"id": "x2", "name": "Two"}],
                      "bowlers": [{"id": "xb1", "name": "Quick"}]},
            "team2": {"id": "y", "name": "Y",
                      "players": [{"id": "y1", "name": "Uno"}, {"id": "y2", "name": "Dos"}],
                      "bowlers": [{"id": "yb1", "name": "Spin"}]}
        }"#;
        let setup: MatchSetup = serde_json::from_str(json).unwrap();
        let m = setup.into_match().unwrap();
        assert_eq!(m.overs_limit, Some(10));
        assert_eq!(m.title, "X vs Y");
    }
}
