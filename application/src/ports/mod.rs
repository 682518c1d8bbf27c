//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod action_executor;
pub mod audit_log;
pub mod clock;
pub mod membership;
pub mod notification;
pub mod policy_source;
