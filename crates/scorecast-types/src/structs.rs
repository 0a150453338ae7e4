//! Match state structs: players, bowlers, teams, and the match snapshot.
//!
//! Base counters (runs, balls, wickets) are the source of truth. Derived
//! rates are stored alongside them so clients can render a snapshot without
//! recomputing, but they are always rebuilt from the base counters when a
//! snapshot changes and are never taken from client input.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DeliveryKind, Innings, MatchStatus, MatchType, TeamSide};
use crate::ids::{BowlerId, MatchId, PlayerId, TeamId};

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Wickets that end an innings.
pub const MAX_WICKETS: u32 = 10;

// ---------------------------------------------------------------------------
// Overs
// ---------------------------------------------------------------------------

/// An overs count: completed overs plus legal balls of the over in progress.
///
/// Rendered as `"15.3"` (fifteen overs and three balls) by [`Display`].
///
/// [`Display`]: core::fmt::Display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Overs {
    /// Fully completed overs.
    pub completed: u32,
    /// Legal balls bowled in the current, incomplete over (0..=5).
    pub balls: u32,
}

impl Overs {
    /// Build an overs count from a total number of legal balls.
    pub const fn from_balls(total: u32) -> Self {
        Self {
            completed: total / BALLS_PER_OVER,
            balls: total % BALLS_PER_OVER,
        }
    }

    /// Total legal balls represented by this count.
    pub const fn total_balls(self) -> u32 {
        self.completed
            .saturating_mul(BALLS_PER_OVER)
            .saturating_add(self.balls)
    }

    /// Count one more legal ball, rolling over into a completed over at six.
    pub const fn add_ball(&mut self) {
        *self = Self::from_balls(self.total_balls().saturating_add(1));
    }
}

impl core::fmt::Display for Overs {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.completed, self.balls)
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A batter in a team's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Identifier, unique within the team.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Runs scored off the bat.
    pub runs: u32,
    /// Balls faced.
    pub balls: u32,
    /// Boundary fours hit.
    pub fours: u32,
    /// Sixes hit.
    pub sixes: u32,
    /// Runs per 100 balls faced (derived).
    #[ts(as = "String")]
    pub strike_rate: Decimal,
    /// Whether this batter is on strike.
    pub is_striker: bool,
    /// Whether this batter has been dismissed.
    pub is_out: bool,
    /// How the batter was dismissed, when out.
    pub dismissal: Option<String>,
}

impl Player {
    /// A fresh batter with no runs and no balls faced.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            strike_rate: Decimal::ZERO,
            is_striker: false,
            is_out: false,
            dismissal: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Bowler
// ---------------------------------------------------------------------------

/// A bowler in a team's roster. Bowls at the opposing side's batters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Bowler {
    /// Identifier, unique within the team.
    pub id: BowlerId,
    /// Display name.
    pub name: String,
    /// Overs bowled.
    pub overs: Overs,
    /// Completed overs in which no runs were conceded.
    pub maidens: u32,
    /// Runs conceded.
    pub runs: u32,
    /// Wickets taken.
    pub wickets: u32,
    /// Runs conceded per six legal balls (derived).
    #[ts(as = "String")]
    pub economy: Decimal,
    /// Whether this bowler is currently operating.
    pub is_current: bool,
}

impl Bowler {
    /// A fresh bowler with no balls bowled.
    pub fn new(id: BowlerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            overs: Overs::default(),
            maidens: 0,
            runs: 0,
            wickets: 0,
            economy: Decimal::ZERO,
            is_current: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Extras
// ---------------------------------------------------------------------------

/// Extras conceded by the fielding side, broken down by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Extras {
    /// Runs from wides.
    pub wides: u32,
    /// Runs from no-balls.
    pub no_balls: u32,
    /// Byes.
    pub byes: u32,
    /// Leg byes.
    pub leg_byes: u32,
    /// Penalty runs, and extras recorded without a classifying token.
    pub penalties: u32,
}

impl Extras {
    /// Sum over every kind.
    pub const fn total(&self) -> u32 {
        self.wides
            .saturating_add(self.no_balls)
            .saturating_add(self.byes)
            .saturating_add(self.leg_byes)
            .saturating_add(self.penalties)
    }

    /// Add `runs` under the bucket for the delivery kind.
    pub const fn record(&mut self, kind: Option<DeliveryKind>, runs: u32) {
        let bucket = match kind {
            Some(DeliveryKind::Wide) => &mut self.wides,
            Some(DeliveryKind::NoBall) => &mut self.no_balls,
            Some(DeliveryKind::Bye) => &mut self.byes,
            Some(DeliveryKind::LegBye) => &mut self.leg_byes,
            Some(DeliveryKind::Legal | DeliveryKind::Penalty) | None => &mut self.penalties,
        };
        *bucket = bucket.saturating_add(runs);
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// One side of a match with its running totals and rosters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Team {
    /// Identifier, unique within the match.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Total runs including extras.
    pub score: u32,
    /// Wickets fallen (0..=10).
    pub wickets: u32,
    /// Overs faced.
    pub overs: Overs,
    /// Extras conceded by the fielding side.
    pub extras: Extras,
    /// Runs per over (derived).
    #[ts(as = "String")]
    pub run_rate: Decimal,
    /// Batting roster in batting order.
    pub players: Vec<Player>,
    /// Bowling roster.
    pub bowlers: Vec<Bowler>,
}

impl Team {
    /// An empty team with the given rosters.
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        players: Vec<Player>,
        bowlers: Vec<Bowler>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            wickets: 0,
            overs: Overs::default(),
            extras: Extras::default(),
            run_rate: Decimal::ZERO,
            players,
            bowlers,
        }
    }

    /// Look up a batter by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Look up a batter by id for mutation.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Look up a bowler by id.
    pub fn bowler(&self, id: &BowlerId) -> Option<&Bowler> {
        self.bowlers.iter().find(|b| &b.id == id)
    }

    /// Look up a bowler by id for mutation.
    pub fn bowler_mut(&mut self, id: &BowlerId) -> Option<&mut Bowler> {
        self.bowlers.iter_mut().find(|b| &b.id == id)
    }

    /// The batter currently on strike, if one has been set.
    pub fn striker(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_striker)
    }

    /// The bowler currently operating, if one has been set.
    pub fn current_bowler(&self) -> Option<&Bowler> {
        self.bowlers.iter().find(|b| b.is_current)
    }

    /// Sum of individual batters' runs. Never exceeds [`Team::score`].
    pub fn batter_runs(&self) -> u32 {
        self.players
            .iter()
            .fold(0_u32, |acc, p| acc.saturating_add(p.runs))
    }
}

// ---------------------------------------------------------------------------
// Partnership
// ---------------------------------------------------------------------------

/// Runs and legal balls added by the current batting pair (derived).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Partnership {
    /// Runs since the last wicket, extras included.
    pub runs: u32,
    /// Legal balls since the last wicket.
    pub balls: u32,
}

/// The batting side's score and legal balls when the current partnership
/// began. The partnership is the difference between these and the live
/// totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PartnershipStart {
    /// Team score when the partnership began.
    pub score: u32,
    /// Team legal balls when the partnership began.
    pub balls: u32,
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// Full live state of one match. This is the snapshot the store holds and
/// the payload broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Match {
    /// Unique match identifier.
    pub id: MatchId,
    /// Human-readable title, e.g. `"Mumbai vs Chennai"`.
    pub title: String,
    /// Match format.
    pub match_type: MatchType,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Overs per innings; present iff the format is limited.
    pub overs_limit: Option<u32>,
    /// Team batting first.
    pub team1: Team,
    /// Team batting second.
    pub team2: Team,
    /// Innings in progress.
    #[ts(type = "1 | 2")]
    pub current_innings: Innings,
    /// Runs team two needs to win; present iff in the second innings.
    pub target: Option<u32>,
    /// Runs per over team two needs from here (derived); present iff in the
    /// second innings.
    #[ts(as = "Option<String>")]
    pub required_run_rate: Option<Decimal>,
    /// Outcome token of the most recent delivery.
    pub last_ball: Option<String>,
    /// Outcome tokens of the over in progress, oldest first.
    pub current_over: Vec<String>,
    /// Runs conceded by the bowler in the over in progress.
    pub current_over_runs: u32,
    /// Current batting pair's contribution (derived).
    pub partnership: Partnership,
    /// Where the current partnership began.
    pub partnership_start: PartnershipStart,
    /// Number of committed updates; strictly increases with every commit.
    pub revision: u64,
}

impl Match {
    /// The team in the given slot.
    pub const fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2,
        }
    }

    /// The team in the given slot, for mutation.
    pub const fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::Team1 => &mut self.team1,
            TeamSide::Team2 => &mut self.team2,
        }
    }

    /// The slot holding the team with the given id.
    pub fn side_of(&self, team: &TeamId) -> Option<TeamSide> {
        if &self.team1.id == team {
            Some(TeamSide::Team1)
        } else if &self.team2.id == team {
            Some(TeamSide::Team2)
        } else {
            None
        }
    }

    /// The side batting in the current innings.
    pub const fn batting_side(&self) -> TeamSide {
        self.current_innings.batting_side()
    }

    /// Compact listing view of this match.
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            match_type: self.match_type,
            status: self.status,
            current_innings: self.current_innings,
            team1: TeamSummary::from(&self.team1),
            team2: TeamSummary::from(&self.team2),
            target: self.target,
            last_ball: self.last_ball.clone(),
            revision: self.revision,
        }
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Scoreline of one team for match listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TeamSummary {
    /// Team identifier.
    pub id: TeamId,
    /// Team name.
    pub name: String,
    /// Total runs.
    pub score: u32,
    /// Wickets fallen.
    pub wickets: u32,
    /// Overs faced.
    pub overs: Overs,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            score: team.score,
            wickets: team.wickets,
            overs: team.overs,
        }
    }
}

/// One row of the match listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MatchSummary {
    /// Match identifier.
    pub id: MatchId,
    /// Match title.
    pub title: String,
    /// Match format.
    pub match_type: MatchType,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Innings in progress.
    #[ts(type = "1 | 2")]
    pub current_innings: Innings,
    /// First-batting team scoreline.
    pub team1: TeamSummary,
    /// Second-batting team scoreline.
    pub team2: TeamSummary,
    /// Target in the second innings.
    pub target: Option<u32>,
    /// Most recent ball outcome.
    pub last_ball: Option<String>,
    /// Snapshot revision the summary was taken from.
    pub revision: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overs_roll_over_at_six_balls() {
        let mut overs = Overs {
            completed: 3,
            balls: 5,
        };
        overs.add_ball();
        assert_eq!(overs, Overs { completed: 4, balls: 0 });
        assert_eq!(overs.total_balls(), 24);
    }

    #[test]
    fn overs_display() {
        let overs = Overs::from_balls(93);
        assert_eq!(overs.to_string(), "15.3");
    }

    #[test]
    fn team_lookups_by_id() {
        let team = Team::new(
            TeamId::new("mi"),
            "Mumbai",
            vec![Player::new(PlayerId::new("p1"), "Rohit")],
            vec![Bowler::new(BowlerId::new("b1"), "Bumrah")],
        );
        assert!(team.player(&PlayerId::new("p1")).is_some());
        assert!(team.player(&PlayerId::new("p9")).is_none());
        assert!(team.bowler(&BowlerId::new("b1")).is_some());
        assert!(team.striker().is_none());
    }

    #[test]
    fn extras_are_bucketed_by_delivery_kind() {
        let mut extras = Extras::default();
        extras.record(Some(DeliveryKind::Wide), 1);
        extras.record(Some(DeliveryKind::NoBall), 1);
        extras.record(Some(DeliveryKind::LegBye), 2);
        extras.record(Some(DeliveryKind::Bye), 4);
        extras.record(None, 5);
        assert_eq!(extras.wides, 1);
        assert_eq!(extras.no_balls, 1);
        assert_eq!(extras.leg_byes, 2);
        assert_eq!(extras.byes, 4);
        assert_eq!(extras.penalties, 5);
        assert_eq!(extras.total(), 13);
    }

    #[test]
    fn decimal_rates_serialize_as_strings() {
        let mut player = Player::new(PlayerId::new("p1"), "Rohit");
        player.strike_rate = Decimal::new(15556, 2);
        let json = serde_json::to_value(&player).ok();
        assert_eq!(
            json.as_ref().and_then(|v| v.get("strike_rate")).and_then(|v| v.as_str()),
            Some("155.56")
        );
    }
}
