//! Core domain concepts shared across all subdomains.
//!
//! - [`participant::ParticipantId`] / [`participant::Participant`]: who votes
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod participant;
