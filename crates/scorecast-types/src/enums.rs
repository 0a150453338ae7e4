//! Enumeration types for live cricket scoring.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Match format
// ---------------------------------------------------------------------------

/// The format of a match, which fixes whether an overs limit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum MatchType {
    /// Ten overs per side.
    #[serde(rename = "T10")]
    T10,
    /// Twenty overs per side.
    #[serde(rename = "T20")]
    T20,
    /// Fifty overs per side (one-day international).
    #[serde(rename = "ODI")]
    Odi,
    /// Unlimited overs (multi-day).
    #[serde(rename = "TEST")]
    Test,
}

impl MatchType {
    /// Overs per side for limited formats, `None` for unlimited.
    pub const fn default_overs_limit(self) -> Option<u32> {
        match self {
            Self::T10 => Some(10),
            Self::T20 => Some(20),
            Self::Odi => Some(50),
            Self::Test => None,
        }
    }

    /// Whether this format caps the overs per innings.
    pub const fn is_limited(self) -> bool {
        self.default_overs_limit().is_some()
    }
}

// ---------------------------------------------------------------------------
// Innings
// ---------------------------------------------------------------------------

/// Which innings is in progress. Serialized as the bare number `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Innings {
    /// Team one is batting.
    First,
    /// Team two is batting and chasing a target.
    Second,
}

impl Innings {
    /// The side batting in this innings.
    pub const fn batting_side(self) -> TeamSide {
        match self {
            Self::First => TeamSide::Team1,
            Self::Second => TeamSide::Team2,
        }
    }

    /// The innings number as used on the wire.
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

impl From<Innings> for u8 {
    fn from(innings: Innings) -> Self {
        innings.number()
    }
}

impl TryFrom<u8> for Innings {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(format!("innings must be 1 or 2, got {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Team side
// ---------------------------------------------------------------------------

/// One of the two team slots in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    /// The `team1` slot.
    Team1,
    /// The `team2` slot.
    Team2,
}

impl TeamSide {
    /// The opposing side.
    pub const fn other(self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }
}

// ---------------------------------------------------------------------------
// Deliveries
// ---------------------------------------------------------------------------

/// Classification of a ball outcome token such as `"4"`, `"W"`, or `"WD"`.
///
/// A token is a run count around an optional marker: `WD` (wide), `NB`
/// (no-ball), `B` (byes), `LB` (leg byes) or `P`/`PEN` (penalty runs), so
/// `"2LB"`, `"NB4"` and `"WD"` all classify. Anything else, including
/// dismissal tokens such as `"W"` or `"LBW"`, is a legal delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    /// A legal delivery: runs off the bat, a dot ball, or a wicket.
    Legal,
    /// A wide. Not a legal ball; extras are charged to the bowler.
    Wide,
    /// A no-ball. Not a legal ball; extras are charged to the bowler.
    NoBall,
    /// Byes. A legal ball; extras are not charged to the bowler.
    Bye,
    /// Leg byes. A legal ball; extras are not charged to the bowler.
    LegBye,
    /// Penalty runs awarded to the batting side. Not a ball at all.
    Penalty,
}

impl DeliveryKind {
    /// Classify a ball outcome token.
    pub fn classify(token: &str) -> Self {
        let token = token.trim().to_ascii_uppercase();
        let marker = token.trim_matches(|c: char| c.is_ascii_digit() || c == '+');
        match marker {
            "WD" => Self::Wide,
            "NB" => Self::NoBall,
            "B" => Self::Bye,
            "LB" => Self::LegBye,
            "P" | "PEN" => Self::Penalty,
            _ => Self::Legal,
        }
    }

    /// Whether the delivery counts toward the six balls of an over.
    pub const fn is_legal(self) -> bool {
        matches!(self, Self::Legal | Self::Bye | Self::LegBye)
    }

    /// Whether the batter on strike faced the delivery.
    pub const fn is_faced(self) -> bool {
        !matches!(self, Self::Wide | Self::Penalty)
    }

    /// Whether extras on this delivery count against the bowler's figures.
    pub const fn charges_bowler(self) -> bool {
        matches!(self, Self::Wide | Self::NoBall)
    }
}

// ---------------------------------------------------------------------------
// Match status
// ---------------------------------------------------------------------------

/// Lifecycle of a match as shown in listings.
///
/// A match opens `Upcoming`, goes `Live` with its first scored delivery,
/// and ends `Completed` or `Abandoned`. It never moves backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Set up but not yet started.
    #[default]
    Upcoming,
    /// Being scored.
    Live,
    /// Finished with a result.
    Completed,
    /// Called off without a result.
    Abandoned,
}

impl MatchStatus {
    /// Whether the match is over and accepts no further updates.
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    /// Whether a match in this status may move to `next`.
    pub const fn can_become(self, next: Self) -> bool {
        match (self, next) {
            (Self::Upcoming, _) => true,
            (Self::Live, Self::Live | Self::Completed | Self::Abandoned) => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why a score update was refused.
///
/// Checks run in the order listed; the first failing check decides the
/// reason reported back to the submitting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// A referenced team, player, or bowler does not exist in the match.
    UnknownEntity,
    /// A runs, balls, or extras delta was negative.
    NegativeDelta,
    /// The batting side already has ten wickets down.
    WicketOverflow,
    /// The update would leave the batting side without exactly one striker.
    StrikerConflict,
    /// A second-innings field was set during the first innings, or the
    /// innings number moved backwards.
    InningsFieldMisuse,
    /// The match is completed or abandoned, or the requested status would
    /// move it backwards.
    StatusConflict,
}

impl core::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::UnknownEntity => "unknown entity",
            Self::NegativeDelta => "negative delta",
            Self::WicketOverflow => "wicket overflow",
            Self::StrikerConflict => "striker conflict",
            Self::InningsFieldMisuse => "innings field misuse",
            Self::StatusConflict => "status conflict",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_type_wire_names() {
        let json = serde_json::to_string(&MatchType::Odi).ok();
        assert_eq!(json.as_deref(), Some("\"ODI\""));
        let parsed: Result<MatchType, _> = serde_json::from_str("\"TEST\"");
        assert!(matches!(parsed, Ok(MatchType::Test)));
    }

    #[test]
    fn only_test_matches_are_unlimited() {
        assert_eq!(MatchType::T20.default_overs_limit(), Some(20));
        assert_eq!(MatchType::Odi.default_overs_limit(), Some(50));
        assert!(!MatchType::Test.is_limited());
    }

    #[test]
    fn innings_round_trips_as_number() {
        let json = serde_json::to_string(&Innings::Second).ok();
        assert_eq!(json.as_deref(), Some("2"));
        let bad: Result<Innings, _> = serde_json::from_str("3");
        assert!(bad.is_err());
    }

    #[test]
    fn innings_batting_side() {
        assert_eq!(Innings::First.batting_side(), TeamSide::Team1);
        assert_eq!(Innings::Second.batting_side(), TeamSide::Team2);
    }

    #[test]
    fn delivery_classification() {
        assert_eq!(DeliveryKind::classify("4"), DeliveryKind::Legal);
        assert_eq!(DeliveryKind::classify("W"), DeliveryKind::Legal);
        assert_eq!(DeliveryKind::classify("wd"), DeliveryKind::Wide);
        assert_eq!(DeliveryKind::classify("1NB"), DeliveryKind::NoBall);
        assert_eq!(DeliveryKind::classify("NB4"), DeliveryKind::NoBall);
        assert_eq!(DeliveryKind::classify("LB"), DeliveryKind::LegBye);
        assert_eq!(DeliveryKind::classify("2lb"), DeliveryKind::LegBye);
        assert_eq!(DeliveryKind::classify("2B"), DeliveryKind::Bye);
        assert_eq!(DeliveryKind::classify("5PEN"), DeliveryKind::Penalty);
    }

    #[test]
    fn dismissal_tokens_are_legal_deliveries() {
        assert_eq!(DeliveryKind::classify("LBW"), DeliveryKind::Legal);
        assert_eq!(DeliveryKind::classify("lbw"), DeliveryKind::Legal);
        assert_eq!(DeliveryKind::classify("W"), DeliveryKind::Legal);
        assert!(DeliveryKind::classify("LBW").is_legal());
    }

    #[test]
    fn wides_and_no_balls_are_not_legal() {
        assert!(!DeliveryKind::Wide.is_legal());
        assert!(!DeliveryKind::NoBall.is_legal());
        assert!(DeliveryKind::Bye.is_legal());
        assert!(DeliveryKind::LegBye.is_legal());
        assert!(!DeliveryKind::Bye.charges_bowler());
        assert!(!DeliveryKind::Penalty.is_legal());
        assert!(!DeliveryKind::Penalty.is_faced());
    }

    #[test]
    fn status_only_moves_forward() {
        assert!(MatchStatus::Upcoming.can_become(MatchStatus::Live));
        assert!(MatchStatus::Live.can_become(MatchStatus::Completed));
        assert!(!MatchStatus::Live.can_become(MatchStatus::Upcoming));
        assert!(!MatchStatus::Completed.can_become(MatchStatus::Live));
        assert!(MatchStatus::Abandoned.is_closed());
        let json = serde_json::to_string(&MatchStatus::Live).ok();
        assert_eq!(json.as_deref(), Some("\"live\""));
    }
}
