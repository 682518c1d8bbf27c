//! Command gating and trusted execution

pub mod command_gate;
pub mod context;

pub use command_gate::{CommandGate, DEFAULT_GATED_COMMANDS, GateDecision};
pub use context::{BallotApproval, ExecutionContext};
