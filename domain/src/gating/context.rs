//! Trusted execution context
//!
//! An approved action is re-submitted to the executor together with a
//! [`BallotApproval`]. The approval is minted only from a passed decision,
//! so holding one proves the action went through a ballot.

use crate::ballot::decision::Decision;
use crate::ballot::entities::ConcludedBallot;
use crate::core::participant::{Participant, ParticipantId};

/// Proof that a specific payload was approved by a ballot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotApproval {
    payload: String,
    initiator: ParticipantId,
}

impl BallotApproval {
    /// Mint an approval for `ballot`, or `None` if the decision failed.
    pub fn from_decision(ballot: &ConcludedBallot, decision: &Decision) -> Option<Self> {
        decision.passed.then(|| Self {
            payload: ballot.action_payload().to_string(),
            initiator: ballot.initiator().id().clone(),
        })
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn initiator(&self) -> &ParticipantId {
        &self.initiator
    }

    /// Whether this approval covers `payload` run by `actor`
    pub fn covers(&self, payload: &str, actor: &ParticipantId) -> bool {
        self.payload == payload.trim() && &self.initiator == actor
    }
}

/// Who runs an action, and on whose authority
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub actor: Participant,
    pub approval: Option<BallotApproval>,
}

impl ExecutionContext {
    /// The actor acting on their own authority
    pub fn direct(actor: Participant) -> Self {
        Self {
            actor,
            approval: None,
        }
    }

    /// The actor running an action a ballot approved
    pub fn approved(actor: Participant, approval: BallotApproval) -> Self {
        Self {
            actor,
            approval: Some(approval),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval.is_some()
    }
}
