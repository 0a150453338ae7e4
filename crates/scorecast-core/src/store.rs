//! Authoritative in-memory match store.
//!
//! Matches live in a [`DashMap`] arena, each behind its own [`Mutex`]. A
//! commit locks only its own match, so updates to one match are serialized
//! while updates to different matches run in parallel. Readers get an
//! [`Arc`] of the latest committed snapshot and never observe a partial
//! update.
//!
//! Lock order is always slot mutex before map shard. The map shard guard
//! is never held while a slot mutex is acquired.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use scorecast_types::{Match, MatchId};

use crate::error::StoreError;

/// One match's latest committed snapshot.
type Slot = Mutex<Arc<Match>>;

/// Registry of live matches keyed by id.
#[derive(Debug, Default)]
pub struct MatchStore {
    matches: DashMap<MatchId, Arc<Slot>>,
}

impl MatchStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new match.
    pub fn insert(&self, snapshot: Match) -> Result<Arc<Match>, StoreError> {
        let id = snapshot.id.clone();
        let snapshot = Arc::new(snapshot);
        match self.matches.entry(id) {
            Entry::Occupied(entry) => Err(StoreError::AlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(Mutex::new(Arc::clone(&snapshot))));
                Ok(snapshot)
            }
        }
    }

    /// The latest committed snapshot of a match.
    pub fn get(&self, id: &MatchId) -> Result<Arc<Match>, StoreError> {
        let slot = self.slot(id)?;
        let current = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(&current))
    }

    /// Remove a match, returning its final snapshot.
    ///
    /// A commit already waiting on the match's lock fails with
    /// [`StoreError::NotFound`] once it acquires it.
    pub fn remove(&self, id: &MatchId) -> Result<Arc<Match>, StoreError> {
        let (_, slot) = self
            .matches
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let last = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(&last))
    }

    /// Latest snapshots of every live match, ordered by match id.
    pub fn list(&self) -> Vec<Arc<Match>> {
        let slots: Vec<Arc<Slot>> = self
            .matches
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut snapshots: Vec<Arc<Match>> = slots
            .iter()
            .map(|slot| Arc::clone(&slot.lock().unwrap_or_else(PoisonError::into_inner)))
            .collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    /// Number of live matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether the store holds no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Replace a match's snapshot with the result of `update`.
    ///
    /// `update` runs under the match's exclusive lock and sees the latest
    /// committed snapshot. If it returns an error the stored snapshot is
    /// left untouched.
    pub fn commit<F, E>(&self, id: &MatchId, update: F) -> Result<Arc<Match>, E>
    where
        F: FnOnce(&Match) -> Result<Match, E>,
        E: From<StoreError>,
    {
        self.commit_and_publish(id, update, |_| {})
    }

    /// Like [`commit`](Self::commit), then run `publish` with the new
    /// snapshot before the lock is released.
    ///
    /// Publishing inside the critical section means observers of one match
    /// see snapshots in commit order. `publish` must not block or call back
    /// into the store for the same match.
    pub fn commit_and_publish<F, P, E>(
        &self,
        id: &MatchId,
        update: F,
        publish: P,
    ) -> Result<Arc<Match>, E>
    where
        F: FnOnce(&Match) -> Result<Match, E>,
        P: FnOnce(&Arc<Match>),
        E: From<StoreError>,
    {
        let slot = self.slot(id)?;
        let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);

        // The match may have been removed while we waited for the lock.
        if !self.is_live(id, &slot) {
            return Err(StoreError::NotFound(id.clone()).into());
        }

        let next = Arc::new(update(&current)?);
        *current = Arc::clone(&next);
        publish(&next);
        Ok(next)
    }

    fn slot(&self, id: &MatchId) -> Result<Arc<Slot>, StoreError> {
        self.matches
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn is_live(&self, id: &MatchId, slot: &Arc<Slot>) -> bool {
        self.matches
            .get(id)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), slot))
    }
}
