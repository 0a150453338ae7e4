//! Mutation applier: the next snapshot from the current one and a
//! validated update.
//!
//! [`apply`] is pure. It clones the current snapshot, folds the update's
//! deltas into the base counters, and then rebuilds every derived field
//! with [`stats::refresh`]. Derived values are never carried over from the
//! previous snapshot or taken from the update.

use scorecast_types::{
    BALLS_PER_OVER, Bowler, DeliveryKind, Innings, Match, MatchStatus, PartnershipStart, PlayerId,
    TeamSide,
};

use crate::stats;
use crate::validation::{ValidatedUpdate, Wicket};

/// Compute the snapshot that results from applying `update` to `current`.
///
/// The returned snapshot has its revision advanced by one.
pub fn apply(current: &Match, update: &ValidatedUpdate) -> Match {
    let mut next = current.clone();

    if update.start_second_innings {
        begin_second_innings(&mut next);
    }
    if let Some(striker) = &update.striker {
        set_striker(&mut next, update.side, striker);
    }
    if let Some(bowler) = &update.bowler {
        let fielding = next.team_mut(update.side.other());
        for b in &mut fielding.bowlers {
            b.is_current = &b.id == bowler;
        }
    }

    credit_batter(&mut next, update);
    credit_team(&mut next, update);
    charge_bowler(&mut next, update);
    record_delivery(&mut next, update);

    if let Some(wicket) = &update.wicket {
        record_wicket(&mut next, update, wicket);
    }
    if let Some(target) = update.target {
        next.target = Some(target);
    }
    advance_status(&mut next, update);

    stats::refresh(&mut next);
    next.revision = next.revision.saturating_add(1);
    next
}

/// Team two takes guard: the over, partnership, and role flags start over.
fn begin_second_innings(next: &mut Match) {
    next.current_innings = Innings::Second;
    next.target = Some(next.team1.score.saturating_add(1));
    next.current_over.clear();
    next.current_over_runs = 0;
    next.last_ball = None;
    next.partnership_start = PartnershipStart {
        score: next.team2.score,
        balls: next.team2.overs.total_balls(),
    };
    for team in [&mut next.team1, &mut next.team2] {
        for player in &mut team.players {
            player.is_striker = false;
        }
        for bowler in &mut team.bowlers {
            bowler.is_current = false;
        }
    }
}

/// The bowler of this delivery in the fielding side's attack.
fn bowler_of<'a>(next: &'a mut Match, update: &ValidatedUpdate) -> Option<&'a mut Bowler> {
    let id = update.bowler.as_ref()?;
    next.team_mut(update.side.other()).bowler_mut(id)
}

fn set_striker(next: &mut Match, side: TeamSide, striker: &PlayerId) {
    for player in &mut next.team_mut(side).players {
        player.is_striker = &player.id == striker;
    }
}

fn credit_batter(next: &mut Match, update: &ValidatedUpdate) {
    let Some(batter_id) = &update.batter else {
        return;
    };
    let Some(batter) = next.team_mut(update.side).player_mut(batter_id) else {
        return;
    };
    batter.runs = batter.runs.saturating_add(update.runs);
    batter.balls = batter.balls.saturating_add(update.batter_balls);
    if !update.boundary {
        return;
    }
    match update.runs {
        4 => batter.fours = batter.fours.saturating_add(1),
        6 => batter.sixes = batter.sixes.saturating_add(1),
        _ => {}
    }
}

fn credit_team(next: &mut Match, update: &ValidatedUpdate) {
    let team = next.team_mut(update.side);
    team.score = team
        .score
        .saturating_add(update.runs)
        .saturating_add(update.extras);
    if update.extras > 0 {
        let kind = update.delivery.as_ref().map(|d| d.kind);
        team.extras.record(kind, update.extras);
    }
}

/// Runs off the bat always count against the bowler; extras only on wides
/// and no-balls.
fn charge_bowler(next: &mut Match, update: &ValidatedUpdate) {
    let charged_extras = update
        .delivery
        .as_ref()
        .filter(|d| d.kind.charges_bowler())
        .map_or(0, |_| update.extras);
    let charged = update.runs.saturating_add(charged_extras);

    if let Some(bowler) = bowler_of(next, update) {
        bowler.runs = bowler.runs.saturating_add(charged);
    }
    if update.delivery.is_some() {
        next.current_over_runs = next.current_over_runs.saturating_add(charged);
    }
}

/// Append the ball token and advance the overs counters. The over closes
/// once it holds six legal tokens, crediting a maiden when nothing was
/// conceded.
fn record_delivery(next: &mut Match, update: &ValidatedUpdate) {
    let Some(delivery) = &update.delivery else {
        return;
    };
    next.last_ball = Some(delivery.token.clone());
    next.current_over.push(delivery.token.clone());

    if !delivery.kind.is_legal() {
        return;
    }

    next.team_mut(update.side).overs.add_ball();
    let over_complete = legal_balls(&next.current_over) >= BALLS_PER_OVER;
    let maiden = over_complete && next.current_over_runs == 0;

    if let Some(bowler) = bowler_of(next, update) {
        bowler.overs.add_ball();
        if maiden {
            bowler.maidens = bowler.maidens.saturating_add(1);
        }
    }

    if over_complete {
        next.current_over.clear();
        next.current_over_runs = 0;
    }
}

fn legal_balls(over: &[String]) -> u32 {
    let count = over
        .iter()
        .filter(|token| DeliveryKind::classify(token).is_legal())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// An explicit status wins. Otherwise the first update that records play
/// takes an upcoming match live.
fn advance_status(next: &mut Match, update: &ValidatedUpdate) {
    if let Some(status) = update.status {
        next.status = status;
        return;
    }
    let records_play = update.delivery.is_some()
        || update.runs > 0
        || update.extras > 0
        || update.batter_balls > 0
        || update.wicket.is_some();
    if next.status == MatchStatus::Upcoming && records_play {
        next.status = MatchStatus::Live;
    }
}

/// Record a dismissal. The partnership restarts from the current totals
/// and nobody is on strike until the next striker update.
fn record_wicket(next: &mut Match, update: &ValidatedUpdate, wicket: &Wicket) {
    let run_out = wicket
        .dismissal
        .as_deref()
        .is_some_and(|d| d.to_ascii_lowercase().contains("run out"));

    if !run_out {
        if let Some(bowler) = bowler_of(next, update) {
            bowler.wickets = bowler.wickets.saturating_add(1);
        }
    }

    let batting = next.team_mut(update.side);
    batting.wickets = batting.wickets.saturating_add(1);
    if let Some(batter_id) = &wicket.batter {
        if let Some(batter) = batting.player_mut(batter_id) {
            batter.is_out = true;
            batter.dismissal = wicket.dismissal.clone();
        }
    }
    for player in &mut batting.players {
        player.is_striker = false;
    }
    let restart = PartnershipStart {
        score: batting.score,
        balls: batting.overs.total_balls(),
    };
    next.partnership_start = restart;
}

#[cfg(test)]
#[allow(clippy::panic, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::testing::sample_match;
    use crate::validation::validate;
    use rust_decimal::Decimal;
    use scorecast_types::{BowlerId, Overs, RawUpdate};

    fn step(m: &Match, raw: &RawUpdate) -> Match {
        match validate(m, raw) {
            Ok(update) => apply(m, &update),
            Err(e) => panic!("update rejected: {e}"),
        }
    }

    fn batter(m: &Match, side: TeamSide, id: &str) -> scorecast_types::Player {
        m.team(side)
            .player(&PlayerId::new(id))
            .cloned()
            .unwrap_or_else(|| panic!("no player {id}"))
    }

    fn bowler(m: &Match, side: TeamSide, id: &str) -> scorecast_types::Bowler {
        m.team(side)
            .bowler(&BowlerId::new(id))
            .cloned()
            .unwrap_or_else(|| panic!("no bowler {id}"))
    }

    #[test]
    fn boundary_updates_batter_and_team() {
        let mut m = sample_match();
        if let Some(p) = m.team1.player_mut(&PlayerId::new("a1")) {
            p.runs = 10;
            p.balls = 8;
        }
        m.team1.score = 10;

        let next = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                ball: Some("4".to_owned()),
                runs_delta: Some(4),
                balls_delta: Some(1),
                ..RawUpdate::default()
            },
        );

        let p1 = batter(&next, TeamSide::Team1, "a1");
        assert_eq!((p1.runs, p1.balls, p1.fours), (14, 9, 1));
        assert_eq!(p1.strike_rate, Decimal::new(15556, 2));
        assert_eq!(next.team1.score, 14);
        assert_eq!(next.revision, m.revision + 1);
    }

    #[test]
    fn sixth_legal_ball_closes_the_over() {
        let mut m = sample_match();
        m.team1.overs = Overs {
            completed: 2,
            balls: 5,
        };
        m.current_over = ["1", "0", "4", "0", "1"].map(String::from).to_vec();
        m.current_over_runs = 6;
        if let Some(b) = m.team2.bowler_mut(&BowlerId::new("bb1")) {
            b.overs = Overs {
                completed: 1,
                balls: 5,
            };
            b.is_current = true;
        }

        let next = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                ball: Some("2".to_owned()),
                runs_delta: Some(2),
                ..RawUpdate::default()
            },
        );

        assert!(next.current_over.is_empty());
        assert_eq!(next.current_over_runs, 0);
        assert_eq!(next.team1.overs, Overs { completed: 3, balls: 0 });
        let b = bowler(&next, TeamSide::Team2, "bb1");
        assert_eq!(b.overs, Overs { completed: 2, balls: 0 });
        assert_eq!(b.maidens, 0);
        assert_eq!(next.last_ball.as_deref(), Some("2"));
    }

    #[test]
    fn wide_does_not_advance_the_over() {
        let m = sample_match();
        let next = step(
            &m,
            &RawUpdate {
                bowler_id: Some(BowlerId::new("bb1")),
                ball: Some("WD".to_owned()),
                extras_delta: Some(1),
                ..RawUpdate::default()
            },
        );

        assert_eq!(next.team1.overs, Overs::default());
        assert_eq!(next.team1.score, 1);
        assert_eq!(next.team1.extras.wides, 1);
        assert_eq!(next.team1.extras.total(), 1);
        assert_eq!(next.current_over, vec!["WD".to_owned()]);
        let b = bowler(&next, TeamSide::Team2, "bb1");
        assert_eq!(b.runs, 1);
        assert!(b.is_current);
    }

    #[test]
    fn byes_are_not_charged_to_the_bowler() {
        let m = sample_match();
        let next = step(
            &m,
            &RawUpdate {
                bowler_id: Some(BowlerId::new("bb1")),
                ball: Some("2LB".to_owned()),
                extras_delta: Some(2),
                ..RawUpdate::default()
            },
        );
        assert_eq!(next.team1.score, 2);
        assert_eq!(next.team1.overs.total_balls(), 1);
        assert_eq!(next.team1.extras.leg_byes, 2);
        assert_eq!(bowler(&next, TeamSide::Team2, "bb1").runs, 0);
    }

    #[test]
    fn all_run_four_is_not_a_boundary() {
        let m = sample_match();
        let run = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                ball: Some("4R".to_owned()),
                runs_delta: Some(4),
                ..RawUpdate::default()
            },
        );
        let unflagged = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                ball: Some("4".to_owned()),
                runs_delta: Some(4),
                boundary: Some(false),
                ..RawUpdate::default()
            },
        );
        let six = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                ball: Some("6".to_owned()),
                runs_delta: Some(6),
                ..RawUpdate::default()
            },
        );
        for next in [&run, &unflagged] {
            let p1 = batter(next, TeamSide::Team1, "a1");
            assert_eq!((p1.runs, p1.fours), (4, 0));
        }
        assert_eq!(batter(&six, TeamSide::Team1, "a1").sixes, 1);
    }

    #[test]
    fn extras_split_by_delivery_kind() {
        let mut m = sample_match();
        for (ball, extras) in [("WD", 1), ("1NB", 1), ("B", 4), ("5P", 5)] {
            m = step(
                &m,
                &RawUpdate {
                    ball: Some(ball.to_owned()),
                    extras_delta: Some(extras),
                    ..RawUpdate::default()
                },
            );
        }
        let extras = m.team1.extras;
        assert_eq!(
            (extras.wides, extras.no_balls, extras.byes, extras.penalties),
            (1, 1, 4, 5)
        );
        assert_eq!(m.team1.score, extras.total());
        // Only the bye is a legal ball.
        assert_eq!(m.team1.overs.total_balls(), 1);
    }

    #[test]
    fn over_closes_on_sixth_legal_token() {
        let mut m = sample_match();
        // Team overs counter out of step with the over in progress.
        m.team1.overs = Overs {
            completed: 0,
            balls: 2,
        };
        m.current_over = ["1", "WD", "0", "2LB", "0", "1NB", "4"]
            .map(String::from)
            .to_vec();

        let next = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                ball: Some("1".to_owned()),
                runs_delta: Some(1),
                ..RawUpdate::default()
            },
        );

        assert!(next.current_over.is_empty());
        assert_eq!(next.current_over_runs, 0);
    }

    #[test]
    fn current_over_never_holds_seven_legal_balls() {
        let mut m = sample_match();
        for ball in ["1", "WD", "0", "0", "NB", "2", "0", "0", "3"] {
            m = step(
                &m,
                &RawUpdate {
                    ball: Some(ball.to_owned()),
                    ..RawUpdate::default()
                },
            );
            assert!(legal_balls(&m.current_over) < BALLS_PER_OVER);
        }
        assert_eq!(m.current_over, vec!["3".to_owned()]);
        assert_eq!(m.team1.overs, Overs { completed: 1, balls: 1 });
    }

    #[test]
    fn first_delivery_takes_the_match_live() {
        let m = sample_match();
        assert_eq!(m.status, MatchStatus::Upcoming);
        let striker = step(
            &m,
            &RawUpdate {
                striker_id: Some(PlayerId::new("a1")),
                ..RawUpdate::default()
            },
        );
        assert_eq!(striker.status, MatchStatus::Upcoming);
        let live = step(
            &striker,
            &RawUpdate {
                ball: Some("0".to_owned()),
                ..RawUpdate::default()
            },
        );
        assert_eq!(live.status, MatchStatus::Live);
        let done = step(
            &live,
            &RawUpdate {
                status: Some(MatchStatus::Completed),
                ..RawUpdate::default()
            },
        );
        assert_eq!(done.status, MatchStatus::Completed);
    }

    #[test]
    fn maiden_over_is_credited() {
        let mut m = sample_match();
        for _ in 0..6 {
            m = step(
                &m,
                &RawUpdate {
                    player_id: Some(PlayerId::new("a1")),
                    bowler_id: Some(BowlerId::new("bb1")),
                    ball: Some("0".to_owned()),
                    ..RawUpdate::default()
                },
            );
        }
        let b = bowler(&m, TeamSide::Team2, "bb1");
        assert_eq!(b.maidens, 1);
        assert_eq!(b.overs, Overs { completed: 1, balls: 0 });
        assert_eq!(b.economy, Decimal::ZERO);
        assert_eq!(batter(&m, TeamSide::Team1, "a1").balls, 6);
    }

    #[test]
    fn wicket_resets_partnership_and_striker() {
        let mut m = sample_match();
        m = step(
            &m,
            &RawUpdate {
                striker_id: Some(PlayerId::new("a1")),
                ..RawUpdate::default()
            },
        );
        m = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                bowler_id: Some(BowlerId::new("bb1")),
                ball: Some("4".to_owned()),
                runs_delta: Some(4),
                ..RawUpdate::default()
            },
        );
        assert_eq!(m.partnership.runs, 4);

        let next = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                ball: Some("W".to_owned()),
                wicket: Some(true),
                dismissal: Some("bowled".to_owned()),
                ..RawUpdate::default()
            },
        );

        assert_eq!(next.team1.wickets, 1);
        assert_eq!(next.partnership.runs, 0);
        assert_eq!(next.partnership.balls, 0);
        assert!(next.team1.striker().is_none());
        let out = batter(&next, TeamSide::Team1, "a1");
        assert!(out.is_out);
        assert_eq!(out.dismissal.as_deref(), Some("bowled"));
        assert_eq!(bowler(&next, TeamSide::Team2, "bb1").wickets, 1);
    }

    #[test]
    fn run_out_is_not_credited_to_the_bowler() {
        let mut m = sample_match();
        if let Some(b) = m.team2.bowler_mut(&BowlerId::new("bb1")) {
            b.is_current = true;
        }
        let next = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a2")),
                ball: Some("W".to_owned()),
                wicket: Some(true),
                dismissal: Some("Run out (Jadeja)".to_owned()),
                ..RawUpdate::default()
            },
        );
        assert_eq!(next.team1.wickets, 1);
        assert_eq!(bowler(&next, TeamSide::Team2, "bb1").wickets, 0);
    }

    #[test]
    fn striker_change_leaves_exactly_one_striker() {
        let mut m = sample_match();
        for id in ["a1", "a2"] {
            m = step(
                &m,
                &RawUpdate {
                    striker_id: Some(PlayerId::new(id)),
                    ..RawUpdate::default()
                },
            );
        }
        let strikers = m.team1.players.iter().filter(|p| p.is_striker).count();
        assert_eq!(strikers, 1);
        assert_eq!(m.team1.striker().map(|p| p.id.as_str()), Some("a2"));
    }

    #[test]
    fn second_innings_sets_target_and_required_rate() {
        let mut m = sample_match();
        m.team1.score = 160;
        m.team1.overs = Overs::from_balls(120);
        m.current_over = vec!["1".to_owned()];

        let next = step(
            &m,
            &RawUpdate {
                innings: Some(2),
                ..RawUpdate::default()
            },
        );

        assert_eq!(next.current_innings, Innings::Second);
        assert_eq!(next.target, Some(161));
        assert!(next.current_over.is_empty());
        // 161 off 120 balls.
        assert_eq!(next.required_run_rate, Some(Decimal::new(805, 2)));
    }

    #[test]
    fn derived_fields_match_base_counters() {
        let mut m = sample_match();
        let script = [
            ("a1", "1", 1),
            ("a2", "4", 4),
            ("a2", "0", 0),
            ("a2", "6", 6),
        ];
        for (id, ball, runs) in script {
            m = step(
                &m,
                &RawUpdate {
                    player_id: Some(PlayerId::new(id)),
                    bowler_id: Some(BowlerId::new("bb2")),
                    ball: Some(ball.to_owned()),
                    runs_delta: Some(runs),
                    ..RawUpdate::default()
                },
            );
        }

        let mut rebuilt = m.clone();
        stats::refresh(&mut rebuilt);
        assert_eq!(rebuilt, m);
        assert!(m.team1.score >= m.team1.batter_runs());
        assert_eq!(m.team1.run_rate, stats::run_rate(11, 4));
        assert_eq!(bowler(&m, TeamSide::Team2, "bb2").economy, stats::economy(11, 4));
        assert_eq!(m.revision, 4);
    }

    #[test]
    fn apply_leaves_input_untouched() {
        let m = sample_match();
        let before = m.clone();
        let _ = step(
            &m,
            &RawUpdate {
                player_id: Some(PlayerId::new("a1")),
                runs_delta: Some(3),
                ..RawUpdate::default()
            },
        );
        assert_eq!(m, before);
    }
}
