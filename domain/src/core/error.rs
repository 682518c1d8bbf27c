//! Domain error types

use super::participant::ParticipantId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} is not an eligible voter for this ballot")]
    NotEligible(ParticipantId),

    #[error("Invalid vote choice: {0} (expected yes or no)")]
    InvalidChoice(String),

    #[error("Invalid participant id: {0:?}")]
    InvalidParticipant(String),
}
