//! Ballot entities
//!
//! A [`Ballot`] is open while votes are being collected. Concluding it
//! consumes the ballot and produces a [`ConcludedBallot`], the only type that
//! carries abstentions. Votes live in a single map from voter to choice, so a
//! voter can never be counted as both YES and NO.

use crate::core::error::DomainError;
use crate::core::participant::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

/// A voter's choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
}

impl VoteChoice {
    pub fn is_yes(&self) -> bool {
        matches!(self, VoteChoice::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Yes => "YES",
            VoteChoice::No => "NO",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_lowercase().as_str() {
            "yes" | "y" => Ok(VoteChoice::Yes),
            "no" | "n" => Ok(VoteChoice::No),
            other => Err(DomainError::InvalidChoice(other.to_string())),
        }
    }
}

/// Result of casting a vote, used for voter-facing feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastOutcome {
    /// The choice now recorded for the voter
    pub choice: VoteChoice,
    /// Whether the voter had already voted on this ballot
    pub changed: bool,
    /// Whether this vote completed the ballot and concluded it
    pub concluded: bool,
}

/// Vote counts at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Tally {
    pub yes: usize,
    pub no: usize,
    /// Eligible voters without a vote (abstentions once concluded)
    pub not_voted: usize,
}

impl Tally {
    /// Votes actually cast (YES + NO)
    pub fn cast(&self) -> usize {
        self.yes + self.no
    }

    pub fn eligible(&self) -> usize {
        self.yes + self.no + self.not_voted
    }
}

/// An open ballot
///
/// # Example
///
/// ```
/// use ballot_domain::{Ballot, Participant, VoteChoice};
/// use std::time::{Duration, Instant};
///
/// let alice = Participant::named("alice");
/// let roster = vec![alice.clone(), Participant::named("bob")];
/// let mut ballot = Ballot::new(alice.clone(), "weather clear", roster, Instant::now(), Duration::from_secs(30));
///
/// assert_eq!(ballot.cast(alice.id(), VoteChoice::Yes), Ok(false));
/// assert_eq!(ballot.cast(alice.id(), VoteChoice::No), Ok(true));
/// assert_eq!(ballot.tally().no, 1);
/// assert!(!ballot.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct Ballot {
    action_payload: String,
    initiator: Participant,
    /// Eligible voters and their display names, fixed at creation
    eligible: BTreeMap<ParticipantId, String>,
    votes: BTreeMap<ParticipantId, VoteChoice>,
    created_at: Instant,
    timeout: Duration,
}

impl Ballot {
    /// Open a ballot over a roster snapshot.
    ///
    /// Duplicate roster entries collapse to one eligible voter.
    pub fn new(
        initiator: Participant,
        action_payload: impl Into<String>,
        roster: impl IntoIterator<Item = Participant>,
        created_at: Instant,
        timeout: Duration,
    ) -> Self {
        let eligible = roster
            .into_iter()
            .map(|p| {
                let name = p.display_name().to_string();
                (p.id().clone(), name)
            })
            .collect();

        Self {
            action_payload: action_payload.into(),
            initiator,
            eligible,
            votes: BTreeMap::new(),
            created_at,
            timeout,
        }
    }

    pub fn action_payload(&self) -> &str {
        &self.action_payload
    }

    pub fn initiator(&self) -> &Participant {
        &self.initiator
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn eligible_count(&self) -> usize {
        self.eligible.len()
    }

    pub fn is_eligible(&self, voter: &ParticipantId) -> bool {
        self.eligible.contains_key(voter)
    }

    pub fn eligible_ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.eligible.keys()
    }

    /// Display name captured at creation, falling back to the raw id.
    pub fn display_name<'a>(&'a self, voter: &'a ParticipantId) -> &'a str {
        self.eligible
            .get(voter)
            .map(String::as_str)
            .unwrap_or_else(|| voter.as_str())
    }

    pub fn vote_of(&self, voter: &ParticipantId) -> Option<VoteChoice> {
        self.votes.get(voter).copied()
    }

    /// Record `choice` for `voter`, replacing any earlier vote.
    ///
    /// Returns `Ok(true)` if the voter had voted before.
    pub fn cast(&mut self, voter: &ParticipantId, choice: VoteChoice) -> Result<bool, DomainError> {
        if !self.is_eligible(voter) {
            return Err(DomainError::NotEligible(voter.clone()));
        }
        Ok(self.votes.insert(voter.clone(), choice).is_some())
    }

    pub fn yes_votes(&self) -> impl Iterator<Item = &ParticipantId> {
        self.votes_for(VoteChoice::Yes)
    }

    pub fn no_votes(&self) -> impl Iterator<Item = &ParticipantId> {
        self.votes_for(VoteChoice::No)
    }

    fn votes_for(&self, choice: VoteChoice) -> impl Iterator<Item = &ParticipantId> {
        self.votes
            .iter()
            .filter(move |(_, c)| **c == choice)
            .map(|(id, _)| id)
    }

    pub fn tally(&self) -> Tally {
        let yes = self.votes.values().filter(|c| c.is_yes()).count();
        let no = self.votes.len() - yes;
        Tally {
            yes,
            no,
            not_voted: self.eligible.len() - self.votes.len(),
        }
    }

    /// Every eligible voter has cast a vote
    pub fn is_complete(&self) -> bool {
        self.votes.len() == self.eligible.len()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Strictly more than the timeout has elapsed
    pub fn is_expired(&self, now: Instant) -> bool {
        self.elapsed(now) > self.timeout
    }

    /// Whole seconds left before expiry, never negative
    pub fn seconds_remaining(&self, now: Instant) -> u64 {
        self.timeout
            .as_secs()
            .saturating_sub(self.elapsed(now).as_secs())
    }

    /// Freeze the ballot. Eligible voters without a vote become abstentions.
    pub fn conclude(self, concluded_at: Instant) -> ConcludedBallot {
        let abstained = self
            .eligible
            .keys()
            .filter(|id| !self.votes.contains_key(*id))
            .cloned()
            .collect();

        ConcludedBallot {
            ballot: self,
            abstained,
            concluded_at,
        }
    }
}

/// A frozen ballot awaiting (or past) its decision
#[derive(Debug, Clone)]
pub struct ConcludedBallot {
    ballot: Ballot,
    abstained: BTreeSet<ParticipantId>,
    concluded_at: Instant,
}

impl ConcludedBallot {
    /// The ballot as it was when voting closed
    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn action_payload(&self) -> &str {
        self.ballot.action_payload()
    }

    pub fn initiator(&self) -> &Participant {
        self.ballot.initiator()
    }

    pub fn eligible_count(&self) -> usize {
        self.ballot.eligible_count()
    }

    pub fn abstained(&self) -> impl Iterator<Item = &ParticipantId> {
        self.abstained.iter()
    }

    /// How long voting stayed open
    pub fn open_for(&self) -> Duration {
        self.ballot.elapsed(self.concluded_at)
    }

    /// Counts with `not_voted` meaning abstentions
    pub fn tally(&self) -> Tally {
        let open = self.ballot.tally();
        debug_assert_eq!(open.not_voted, self.abstained.len());
        Tally {
            not_voted: self.abstained.len(),
            ..open
        }
    }
}
