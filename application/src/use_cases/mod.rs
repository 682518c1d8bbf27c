//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod expiry_sweep;
pub mod gated_execution;
pub mod submit_command;
pub mod vote_engine;
