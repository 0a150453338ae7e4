//! Score update validation.
//!
//! [`validate`] turns a [`RawUpdate`] into a [`ValidatedUpdate`] by checking
//! it against the current match snapshot. The checks run in a fixed order
//! and the first failure decides the [`RejectionReason`]:
//!
//! 1. Entities -- referenced team is batting; batter, bowler, and striker
//!    exist
//! 2. Deltas -- runs, balls, and extras are non-negative
//! 3. Wickets -- a wicket would not take the batting side past ten
//! 4. Striker -- the batting side keeps exactly one striker
//! 5. Innings -- second-innings fields stay out of the first innings
//! 6. Status -- the match is still open and its status only moves forward
//!
//! Validation has no side effects, so rejecting the same update twice
//! yields the same reason both times.

use scorecast_types::{
    BowlerId, DeliveryKind, Innings, MAX_WICKETS, Match, MatchStatus, PlayerId, RawUpdate,
    RejectionReason, TeamSide,
};

use crate::error::ValidationError;

/// A delivery outcome token with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// The token as submitted, trimmed.
    pub token: String,
    /// How the delivery counts.
    pub kind: DeliveryKind,
}

/// A wicket recorded by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wicket {
    /// The dismissed batter, when named.
    pub batter: Option<PlayerId>,
    /// How the batter was dismissed.
    pub dismissal: Option<String>,
}

/// An update that has passed every check against a specific snapshot.
///
/// Only [`validate`] can build one, so the mutation applier never sees
/// unchecked input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpdate {
    pub(crate) side: TeamSide,
    pub(crate) batter: Option<PlayerId>,
    pub(crate) bowler: Option<BowlerId>,
    pub(crate) runs: u32,
    pub(crate) batter_balls: u32,
    pub(crate) extras: u32,
    pub(crate) delivery: Option<Delivery>,
    pub(crate) wicket: Option<Wicket>,
    pub(crate) striker: Option<PlayerId>,
    pub(crate) start_second_innings: bool,
    pub(crate) target: Option<u32>,
    pub(crate) boundary: bool,
    pub(crate) status: Option<MatchStatus>,
}

impl ValidatedUpdate {
    /// The batting side the update applies to.
    pub const fn side(&self) -> TeamSide {
        self.side
    }

    /// Whether the update records a wicket.
    pub const fn is_wicket(&self) -> bool {
        self.wicket.is_some()
    }

    /// The classified delivery, if the update carries a ball token.
    pub const fn delivery(&self) -> Option<&Delivery> {
        self.delivery.as_ref()
    }
}

/// Validate a raw update against the current snapshot.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first check that failed.
pub fn validate(current: &Match, raw: &RawUpdate) -> Result<ValidatedUpdate, ValidationError> {
    let entities = check_entities(current, raw)?;
    let deltas = check_deltas(raw)?;
    check_wickets(current, raw, &entities)?;
    check_striker(current, raw, &entities)?;
    let (start_second_innings, target) = check_innings(current, raw)?;
    check_status(current, raw)?;

    let delivery = raw
        .ball
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Delivery {
            token: token.to_owned(),
            kind: DeliveryKind::classify(token),
        });

    // A named batter faces the ball unless it was a wide or penalty runs.
    let batter_balls = deltas.balls.unwrap_or_else(|| {
        match (&entities.batter, &delivery) {
            (Some(_), Some(d)) if d.kind.is_faced() => 1,
            _ => 0,
        }
    });

    let boundary = raw.boundary.unwrap_or_else(|| {
        delivery
            .as_ref()
            .is_some_and(|d| matches!(d.token.as_str(), "4" | "6"))
    });

    let wicket = raw.is_wicket().then(|| Wicket {
        batter: entities.batter.clone(),
        dismissal: raw.dismissal.clone(),
    });

    Ok(ValidatedUpdate {
        side: entities.side,
        batter: entities.batter,
        bowler: entities.bowler,
        runs: deltas.runs,
        batter_balls,
        extras: deltas.extras,
        delivery,
        wicket,
        striker: raw.striker_id.clone(),
        start_second_innings,
        target,
        boundary,
        status: raw.status,
    })
}

/// Entities resolved by the first check.
struct Entities {
    side: TeamSide,
    batter: Option<PlayerId>,
    bowler: Option<BowlerId>,
}

/// Non-negative deltas from the second check.
struct Deltas {
    runs: u32,
    balls: Option<u32>,
    extras: u32,
}

/// Whether the update moves the match from the first into the second
/// innings. Entities on such an update belong to the chasing side.
fn starts_second_innings(current: &Match, raw: &RawUpdate) -> bool {
    current.current_innings == Innings::First && raw.innings == Some(Innings::Second.number())
}

fn check_entities(current: &Match, raw: &RawUpdate) -> Result<Entities, ValidationError> {
    let transition = starts_second_innings(current, raw);
    let side = if transition {
        Innings::Second.batting_side()
    } else {
        current.batting_side()
    };
    if let Some(team_id) = &raw.team_id {
        let named = current.side_of(team_id).ok_or_else(|| {
            ValidationError::new(
                RejectionReason::UnknownEntity,
                format!("team {team_id} is not playing in match {}", current.id),
            )
        })?;
        if named != side {
            return Err(ValidationError::new(
                RejectionReason::UnknownEntity,
                format!("team {team_id} is not batting"),
            ));
        }
    }
    let batting = current.team(side);
    let fielding = current.team(side.other());

    if let Some(player_id) = &raw.player_id {
        if batting.player(player_id).is_none() {
            return Err(ValidationError::new(
                RejectionReason::UnknownEntity,
                format!("player {player_id} is not in the {} roster", batting.name),
            ));
        }
    }

    if let Some(striker_id) = &raw.striker_id {
        if batting.player(striker_id).is_none() {
            return Err(ValidationError::new(
                RejectionReason::UnknownEntity,
                format!("striker {striker_id} is not in the {} roster", batting.name),
            ));
        }
    }

    let bowler = match &raw.bowler_id {
        Some(bowler_id) => {
            if fielding.bowler(bowler_id).is_none() {
                return Err(ValidationError::new(
                    RejectionReason::UnknownEntity,
                    format!("bowler {bowler_id} is not in the {} attack", fielding.name),
                ));
            }
            Some(bowler_id.clone())
        }
        // Bowling flags are reset when the innings changes.
        None if transition => None,
        None => fielding.current_bowler().map(|b| b.id.clone()),
    };

    Ok(Entities {
        side,
        batter: raw.player_id.clone(),
        bowler,
    })
}

fn non_negative(field: &str, value: Option<i32>) -> Result<Option<u32>, ValidationError> {
    value
        .map(|v| {
            u32::try_from(v).ok().ok_or_else(|| {
                ValidationError::new(
                    RejectionReason::NegativeDelta,
                    format!("{field} must not be negative, got {v}"),
                )
            })
        })
        .transpose()
}

fn check_deltas(raw: &RawUpdate) -> Result<Deltas, ValidationError> {
    Ok(Deltas {
        runs: non_negative("runs_delta", raw.runs_delta)?.unwrap_or(0),
        balls: non_negative("balls_delta", raw.balls_delta)?,
        extras: non_negative("extras_delta", raw.extras_delta)?.unwrap_or(0),
    })
}

fn check_wickets(
    current: &Match,
    raw: &RawUpdate,
    entities: &Entities,
) -> Result<(), ValidationError> {
    if !raw.is_wicket() {
        return Ok(());
    }
    let batting = current.team(entities.side);
    if batting.wickets >= MAX_WICKETS {
        return Err(ValidationError::new(
            RejectionReason::WicketOverflow,
            format!("{} already have {MAX_WICKETS} wickets down", batting.name),
        ));
    }
    Ok(())
}

fn check_striker(
    current: &Match,
    raw: &RawUpdate,
    entities: &Entities,
) -> Result<(), ValidationError> {
    let batting = current.team(entities.side);

    if let Some(batter) = entities.batter.as_ref().and_then(|id| batting.player(id)) {
        if batter.is_out {
            return Err(ValidationError::new(
                RejectionReason::StrikerConflict,
                format!("player {} is already out", batter.id),
            ));
        }
    }

    let Some(striker_id) = &raw.striker_id else {
        return Ok(());
    };
    if raw.is_wicket() {
        return Err(ValidationError::new(
            RejectionReason::StrikerConflict,
            "a new striker cannot be set on the same update as a wicket",
        ));
    }
    if batting.player(striker_id).is_some_and(|p| p.is_out) {
        return Err(ValidationError::new(
            RejectionReason::StrikerConflict,
            format!("player {striker_id} is out and cannot take strike"),
        ));
    }
    Ok(())
}

fn check_innings(current: &Match, raw: &RawUpdate) -> Result<(bool, Option<u32>), ValidationError> {
    let start_second_innings = match raw.innings {
        None => false,
        Some(number) => {
            let requested = Innings::try_from(number)
                .map_err(|e| ValidationError::new(RejectionReason::InningsFieldMisuse, e))?;
            match (current.current_innings, requested) {
                (Innings::First, Innings::Second) => true,
                (Innings::Second, Innings::First) => {
                    return Err(ValidationError::new(
                        RejectionReason::InningsFieldMisuse,
                        "innings cannot move back from 2 to 1",
                    ));
                }
                _ => false,
            }
        }
    };

    if raw.target.is_some() && current.current_innings == Innings::First && !start_second_innings {
        return Err(ValidationError::new(
            RejectionReason::InningsFieldMisuse,
            "target can only be set during the second innings",
        ));
    }

    Ok((start_second_innings, raw.target))
}

fn check_status(current: &Match, raw: &RawUpdate) -> Result<(), ValidationError> {
    if current.status.is_closed() {
        return Err(ValidationError::new(
            RejectionReason::StatusConflict,
            format!("match {} is {:?} and takes no updates", current.id, current.status),
        ));
    }
    match raw.status {
        Some(next) if !current.status.can_become(next) => Err(ValidationError::new(
            RejectionReason::StatusConflict,
            format!("status cannot move from {:?} to {next:?}", current.status),
        )),
        _ => Ok(()),
    }
}
