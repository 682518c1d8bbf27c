//! Concurrent ballot registry.
//!
//! The map lock only guards which slots exist. Each ballot lives behind its
//! own mutex inside a [`BallotSlot`], so casting on one ballot never waits
//! for another. Lock order is always map, then slot.
//!
//! Concluding a ballot means taking it out of its slot under the slot lock.
//! Whoever takes it concludes it; everyone else finds the slot empty. The
//! empty slot is removed from the map afterwards.

use ballot_domain::{Ballot, ParticipantId};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// One registered ballot and the data needed to find it without locking it
#[derive(Debug)]
pub struct BallotSlot {
    seq: u64,
    initiator: ParticipantId,
    eligible: BTreeSet<ParticipantId>,
    ballot: Mutex<Option<Ballot>>,
}

impl BallotSlot {
    fn new(seq: u64, ballot: Ballot) -> Self {
        Self {
            seq,
            initiator: ballot.initiator().id().clone(),
            eligible: ballot.eligible_ids().cloned().collect(),
            ballot: Mutex::new(Some(ballot)),
        }
    }

    /// Registration order; lower is older
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn initiator(&self) -> &ParticipantId {
        &self.initiator
    }

    pub fn is_eligible(&self, voter: &ParticipantId) -> bool {
        self.eligible.contains(voter)
    }

    /// Lock the ballot. `None` means it has already been concluded.
    pub fn lock(&self) -> MutexGuard<'_, Option<Ballot>> {
        self.ballot.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }
}

/// Registry mapping each initiator to at most one open ballot
#[derive(Debug, Default)]
pub struct BallotStore {
    slots: RwLock<HashMap<ParticipantId, Arc<BallotSlot>>>,
    next_seq: AtomicU64,
}

impl BallotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ballot` unless its initiator already has an open one.
    ///
    /// The check and the insert happen under one write lock. On conflict the
    /// ballot is handed back unchanged.
    pub fn try_insert(&self, ballot: Ballot) -> Result<Arc<BallotSlot>, Ballot> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        let initiator = ballot.initiator().id().clone();

        if let Some(existing) = slots.get(&initiator)
            && existing.is_open()
        {
            return Err(ballot);
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let slot = Arc::new(BallotSlot::new(seq, ballot));
        slots.insert(initiator, Arc::clone(&slot));
        Ok(slot)
    }

    /// Whether `initiator` has an open ballot
    pub fn has_open(&self, initiator: &ParticipantId) -> bool {
        self.get(initiator).is_some_and(|slot| slot.is_open())
    }

    pub fn get(&self, initiator: &ParticipantId) -> Option<Arc<BallotSlot>> {
        self.read().get(initiator).cloned()
    }

    /// Slots where `voter` is eligible, oldest first
    pub fn candidates_for(&self, voter: &ParticipantId) -> Vec<Arc<BallotSlot>> {
        let mut found: Vec<_> = self
            .read()
            .values()
            .filter(|slot| slot.is_eligible(voter))
            .cloned()
            .collect();
        found.sort_by_key(|slot| slot.seq);
        found
    }

    /// Remove `slot` if it is still the registered one for its initiator.
    ///
    /// A newer ballot from the same initiator is left alone.
    pub fn remove(&self, slot: &Arc<BallotSlot>) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        match slots.get(&slot.initiator) {
            Some(current) if Arc::ptr_eq(current, slot) => {
                slots.remove(&slot.initiator);
                true
            }
            _ => false,
        }
    }

    /// Every registered slot, oldest first
    pub fn snapshot(&self) -> Vec<Arc<BallotSlot>> {
        let mut all: Vec<_> = self.read().values().cloned().collect();
        all.sort_by_key(|slot| slot.seq);
        all
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ParticipantId, Arc<BallotSlot>>> {
        self.slots.read().unwrap_or_else(|e| e.into_inner())
    }
}
