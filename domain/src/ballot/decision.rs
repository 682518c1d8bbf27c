//! Tallying rules
//!
//! [`decide`] is a pure function of a frozen ballot and a policy snapshot.
//! The checks run in a fixed order and the first failing check is the
//! reported reason.

use super::entities::ConcludedBallot;
use crate::policy::VotingPolicy;

/// Why a ballot failed
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// Fewer votes were cast than the policy requires
    InsufficientVotes { cast: usize, required: usize },
    /// Cast votes did not exceed half of the eligible voters
    InsufficientParticipation { cast: usize, eligible: usize },
    /// Neither YES nor effective NO votes exist
    NoEffectiveVotes,
    /// The YES share fell short of the approval threshold
    BelowThreshold { approval: f64, required: f64 },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::InsufficientVotes { cast, required } => {
                write!(f, "Insufficient votes: {}/{} required", cast, required)
            }
            FailureReason::InsufficientParticipation { .. } => {
                write!(f, "Insufficient participation (>50% required)")
            }
            FailureReason::NoEffectiveVotes => write!(f, "No effective votes"),
            FailureReason::BelowThreshold { approval, required } => write!(
                f,
                "Approval {:.0}% below required {:.0}%",
                approval * 100.0,
                required * 100.0
            ),
        }
    }
}

/// Outcome of tallying a concluded ballot
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub passed: bool,
    /// Set exactly when `passed` is false
    pub reason: Option<FailureReason>,
    /// YES share of the effective total, when it could be computed
    pub approval: Option<f64>,
}

impl Decision {
    fn pass(approval: f64) -> Self {
        Self {
            passed: true,
            reason: None,
            approval: Some(approval),
        }
    }

    fn fail(reason: FailureReason) -> Self {
        let approval = match &reason {
            FailureReason::BelowThreshold { approval, .. } => Some(*approval),
            _ => None,
        };
        Self {
            passed: false,
            reason: Some(reason),
            approval,
        }
    }

    /// Audit status tag
    pub fn status_tag(&self) -> &'static str {
        if self.passed { "PASSED" } else { "FAILED" }
    }
}

/// Decide whether a concluded ballot passed under `policy`.
///
/// # Example
///
/// ```
/// use ballot_domain::{decide, Ballot, FailureReason, Participant, VoteChoice, VotingPolicy};
/// use std::time::{Duration, Instant};
///
/// let roster: Vec<_> = ["a", "b", "c"].iter().map(|n| Participant::named(n)).collect();
/// let mut ballot = Ballot::new(roster[0].clone(), "weather rain", roster.clone(), Instant::now(), Duration::from_secs(30));
/// ballot.cast(roster[0].id(), VoteChoice::Yes).unwrap();
///
/// let decision = decide(&ballot.conclude(Instant::now()), &VotingPolicy::default());
/// assert!(!decision.passed);
/// assert_eq!(decision.reason, Some(FailureReason::InsufficientVotes { cast: 1, required: 2 }));
/// ```
pub fn decide(ballot: &ConcludedBallot, policy: &VotingPolicy) -> Decision {
    let tally = ballot.tally();
    let total_cast = tally.cast();

    // 1. Minimum cast votes
    if total_cast < policy.minimum_votes_required {
        return Decision::fail(FailureReason::InsufficientVotes {
            cast: total_cast,
            required: policy.minimum_votes_required,
        });
    }

    // 2. Majority participation; exactly half is not a majority
    if policy.require_majority_participation {
        let eligible = ballot.eligible_count();
        let participation = if eligible == 0 {
            0.0
        } else {
            total_cast as f64 / eligible as f64
        };
        if participation <= 0.5 {
            return Decision::fail(FailureReason::InsufficientParticipation {
                cast: total_cast,
                eligible,
            });
        }
    }

    // 3. Effective total
    let effective_no = tally.no
        + if policy.count_abstentions_as_no {
            tally.not_voted
        } else {
            0
        };
    let effective_total = tally.yes + effective_no;
    if effective_total == 0 {
        return Decision::fail(FailureReason::NoEffectiveVotes);
    }

    // 4. Threshold (inclusive)
    let approval = tally.yes as f64 / effective_total as f64;
    if approval >= policy.approval_threshold {
        Decision::pass(approval)
    } else {
        Decision::fail(FailureReason::BelowThreshold {
            approval,
            required: policy.approval_threshold,
        })
    }
}
