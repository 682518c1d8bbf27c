//! Application layer for ballot-gate
//!
//! This crate contains the vote engine, port definitions, and the shared
//! runtime policy. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod store;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::SharedPolicy;
pub use ports::{
    action_executor::{ActionExecutor, ExecutorError},
    audit_log::{AuditError, AuditRecord, AuditSink, AuditTag, NoAuditLog},
    clock::{Clock, ManualClock, SystemClock},
    membership::{MembershipSource, RosterRegistry},
    notification::{NoNotifications, NotificationSink},
    policy_source::{PolicyAccessError, PolicyAccessorPort, PolicySource},
};
pub use store::{BallotSlot, BallotStore};
pub use use_cases::expiry_sweep::spawn_expiry_sweeper;
pub use use_cases::gated_execution::GatedExecutor;
pub use use_cases::submit_command::{SubmitCommandUseCase, SubmitError, SubmitOutcome};
pub use use_cases::vote_engine::{
    BallotHandle, BallotStatus, CastError, InitiationError, VoteEngine,
};
