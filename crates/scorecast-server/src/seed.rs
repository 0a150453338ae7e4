//! Opening the matches listed in the `seed` section of the config.

use scorecast_core::{MatchSetup, ScoreRelay};
use tracing::info;

use crate::error::AppError;

/// Open every seed match. Stops at the first invalid entry.
pub fn seed_matches(relay: &ScoreRelay, setups: Vec<MatchSetup>) -> Result<usize, AppError> {
    let mut opened = 0_usize;
    for setup in setups {
        let match_id = setup.id.clone();
        let snapshot = relay
            .create_match(setup)
            .map_err(|source| AppError::Seed { match_id, source })?;
        info!(match_id = %snapshot.id, title = %snapshot.title, "Seed match opened");
        opened = opened.saturating_add(1);
    }
    Ok(opened)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use scorecast_core::ScorecastConfig;
    use scorecast_gateway::ConnectionHub;

    use super::*;

    const TWO_MATCHES: &str = r"
seed:
  matches:
    - id: m1
      title: A vs B
      match_type: T20
      team1:
        id: a
        name: A
        players: [{id: a1, name: A1}, {id: a2, name: A2}]
        bowlers: [{id: ab1, name: AB1}]
      team2:
        id: b
        name: B
        players: [{id: b1, name: B1}, {id: b2, name: B2}]
        bowlers: [{id: bb1, name: BB1}]
    - id: m2
      title: C vs D
      match_type: TEST
      team1:
        id: c
        name: C
        players: [{id: c1, name: C1}, {id: c2, name: C2}]
        bowlers: [{id: cb1, name: CB1}]
      team2:
        id: d
        name: D
        players: [{id: d1, name: D1}, {id: d2, name: D2}]
        bowlers: [{id: db1, name: DB1}]
";

    fn relay() -> ScoreRelay {
        ScoreRelay::new(Arc::new(ConnectionHub::new()))
    }

    fn seeds() -> Vec<MatchSetup> {
        ScorecastConfig::parse_yaml(TWO_MATCHES).unwrap().seed.matches
    }

    #[test]
    fn opens_every_seed_match() {
        let relay = relay();
        let opened = seed_matches(&relay, seeds()).unwrap();
        assert_eq!(opened, 2);
        assert_eq!(relay.match_count(), 2);
    }

    #[test]
    fn duplicate_seed_fails_with_its_id() {
        let relay = relay();
        let mut setups = seeds();
        let first = setups.first().cloned().unwrap();
        setups.push(first);
        let err = seed_matches(&relay, setups).err();
        assert!(matches!(err, Some(AppError::Seed { ref match_id, .. }) if match_id == "m1"));
    }

    #[test]
    fn default_config_has_no_seeds() {
        let relay = relay();
        let config = ScorecastConfig::default();
        assert_eq!(seed_matches(&relay, config.seed.matches).unwrap(), 0);
    }
}
