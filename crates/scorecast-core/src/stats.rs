//! Derived cricket statistics.
//!
//! Every rate here is a pure function of base counters, rounded to two
//! decimal places with [`Decimal`] so that re-deriving a snapshot's rates
//! from its counters always reproduces the stored values exactly.

use rust_decimal::Decimal;
use scorecast_types::{BALLS_PER_OVER, Innings, Match, Partnership, Team};

/// Decimal places kept on every derived rate.
const RATE_PRECISION: u32 = 2;

/// `numerator * scale / denominator`, rounded; zero when `denominator` is 0.
fn scaled_ratio(numerator: u32, scale: u32, denominator: u32) -> Decimal {
    if denominator == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(numerator)
        .checked_mul(Decimal::from(scale))
        .and_then(|scaled| scaled.checked_div(Decimal::from(denominator)))
        .map_or(Decimal::ZERO, |rate| rate.round_dp(RATE_PRECISION))
}

/// Runs per 100 balls faced.
pub fn strike_rate(runs: u32, balls: u32) -> Decimal {
    scaled_ratio(runs, 100, balls)
}

/// Runs conceded per six legal balls bowled.
pub fn economy(runs: u32, balls: u32) -> Decimal {
    scaled_ratio(runs, BALLS_PER_OVER, balls)
}

/// Runs per over from a total and the legal balls faced.
pub fn run_rate(score: u32, balls: u32) -> Decimal {
    scaled_ratio(score, BALLS_PER_OVER, balls)
}

/// Runs per over still needed to reach `target`.
///
/// Unlimited matches have no balls-remaining constraint and report zero,
/// as does a chase that is already won or has no balls left.
pub fn required_run_rate(
    target: u32,
    score: u32,
    balls_faced: u32,
    overs_limit: Option<u32>,
) -> Decimal {
    let needed = target.saturating_sub(score);
    let Some(limit) = overs_limit else {
        return Decimal::ZERO;
    };
    let remaining = limit
        .saturating_mul(BALLS_PER_OVER)
        .saturating_sub(balls_faced);
    scaled_ratio(needed, BALLS_PER_OVER, remaining)
}

/// Recompute the derived fields of one team and its rosters.
fn refresh_team(team: &mut Team) {
    team.run_rate = run_rate(team.score, team.overs.total_balls());
    for player in &mut team.players {
        player.strike_rate = strike_rate(player.runs, player.balls);
    }
    for bowler in &mut team.bowlers {
        bowler.economy = economy(bowler.runs, bowler.overs.total_balls());
    }
}

/// Recompute every derived field of a match from its base counters.
///
/// Also enforces the innings invariant: target and required run rate are
/// present in the second innings and absent in the first.
pub fn refresh(snapshot: &mut Match) {
    refresh_team(&mut snapshot.team1);
    refresh_team(&mut snapshot.team2);

    let batting = snapshot.team(snapshot.batting_side());
    let batting_score = batting.score;
    let batting_balls = batting.overs.total_balls();

    snapshot.partnership = Partnership {
        runs: batting_score.saturating_sub(snapshot.partnership_start.score),
        balls: batting_balls.saturating_sub(snapshot.partnership_start.balls),
    };

    match snapshot.current_innings {
        Innings::First => {
            snapshot.target = None;
            snapshot.required_run_rate = None;
        }
        Innings::Second => {
            let target = snapshot
                .target
                .unwrap_or_else(|| snapshot.team1.score.saturating_add(1));
            snapshot.target = Some(target);
            snapshot.required_run_rate = Some(required_run_rate(
                target,
                batting_score,
                batting_balls,
                snapshot.overs_limit,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strike_rate_rounds_to_two_places() {
        assert_eq!(strike_rate(14, 9), Decimal::new(15556, 2));
        assert_eq!(strike_rate(50, 25), Decimal::new(200, 0));
    }

    #[test]
    fn rates_are_zero_without_balls() {
        assert_eq!(strike_rate(10, 0), Decimal::ZERO);
        assert_eq!(economy(12, 0), Decimal::ZERO);
        assert_eq!(run_rate(0, 0), Decimal::ZERO);
    }

    #[test]
    fn economy_is_per_six_balls() {
        // 32 runs off 4 overs.
        assert_eq!(economy(32, 24), Decimal::new(8, 0));
    }

    #[test]
    fn run_rate_uses_partial_overs() {
        // 150 off 15.3 overs.
        assert_eq!(run_rate(150, 93), Decimal::new(968, 2));
    }

    #[test]
    fn required_run_rate_for_limited_chase() {
        // Need 186, have 100 after 10 overs of 20: 86 off 60 balls.
        assert_eq!(
            required_run_rate(186, 100, 60, Some(20)),
            Decimal::new(860, 2)
        );
    }

    #[test]
    fn required_run_rate_is_zero_when_won_or_unlimited() {
        assert_eq!(required_run_rate(100, 120, 30, Some(20)), Decimal::ZERO);
        assert_eq!(required_run_rate(300, 10, 30, None), Decimal::ZERO);
        assert_eq!(required_run_rate(300, 10, 120, Some(20)), Decimal::ZERO);
    }
}
