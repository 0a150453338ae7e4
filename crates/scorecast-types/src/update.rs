//! Wire-level partial score update submitted by a scorer.
//!
//! Every field is optional; an update carries only what changed on this
//! delivery. Deltas are signed on the wire so that a negative value reaches
//! validation and is rejected with a precise reason instead of failing to
//! parse.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::MatchStatus;
use crate::ids::{BowlerId, PlayerId, TeamId};

/// A partial, unvalidated score update.
///
/// Derived values (strike rate, run rate, economy, partnership, required
/// run rate) are deliberately absent: they are always recomputed from the
/// counters below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct RawUpdate {
    /// Batting team. Defaults to the side batting in the current innings.
    pub team_id: Option<TeamId>,
    /// Batter credited with the runs, or dismissed on a wicket.
    pub player_id: Option<PlayerId>,
    /// Bowler of the delivery, from the fielding side. Also marks that
    /// bowler as the current bowler. Defaults to the current bowler.
    pub bowler_id: Option<BowlerId>,
    /// Runs off the bat.
    pub runs_delta: Option<i32>,
    /// Balls faced by the batter. Defaults to one when a batter faces a
    /// legal delivery or a no-ball.
    pub balls_delta: Option<i32>,
    /// Extras (wides, no-balls, byes, leg byes) added to the team total.
    pub extras_delta: Option<i32>,
    /// Outcome token of the delivery, e.g. `"4"`, `"W"`, `"WD"`.
    pub ball: Option<String>,
    /// Whether the runs off the bat were a boundary. When absent, a ball
    /// token of exactly `"4"` or `"6"` marks one.
    pub boundary: Option<bool>,
    /// Whether a wicket fell.
    pub wicket: Option<bool>,
    /// Dismissal description, e.g. `"caught"`, `"run out"`.
    pub dismissal: Option<String>,
    /// Batter to put on strike. Clears the flag on every other batter.
    pub striker_id: Option<PlayerId>,
    /// Move to the given innings. Only `1 -> 2` is a transition.
    pub innings: Option<u8>,
    /// Override the second-innings target.
    pub target: Option<u32>,
    /// Move the match to the given status.
    pub status: Option<MatchStatus>,
}

impl RawUpdate {
    /// Whether the update records a wicket.
    pub fn is_wicket(&self) -> bool {
        self.wicket.unwrap_or(false)
    }
}
