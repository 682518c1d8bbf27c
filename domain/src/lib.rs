//! Domain layer for ballot-gate
//!
//! This crate contains the voting rules: ballots, policy, tallying and the
//! command gate. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Ballot
//!
//! A [`Ballot`] is one in-flight vote on an action payload. The eligible
//! voters are fixed when it opens. Concluding it yields a
//! [`ConcludedBallot`] whose non-responders are abstentions.
//!
//! ## Decision
//!
//! [`decide`] applies the [`VotingPolicy`] to a concluded ballot:
//! minimum votes, majority participation, then the approval threshold.
//!
//! ## Gating
//!
//! [`CommandGate`] decides which commands need a ballot. A passed decision
//! mints a [`BallotApproval`] that lets the approved command through.

pub mod ballot;
pub mod core;
pub mod gating;
pub mod policy;

// Re-export commonly used types
pub use ballot::{
    AUDIT_SEPARATOR, Ballot, CastOutcome, ConcludedBallot, Decision, FailureReason, NoticeTemplate,
    Tally, VoteChoice, decide,
};
pub use core::{
    error::DomainError,
    participant::{Participant, ParticipantId},
};
pub use gating::{BallotApproval, CommandGate, DEFAULT_GATED_COMMANDS, ExecutionContext, GateDecision};
pub use policy::{ConfigIssue, ConfigIssueCode, PolicyKey, Severity, VotingPolicy};
