//! Action executor port
//!
//! Defines the interface for running an action payload on behalf of a
//! participant. The engine never interprets the payload itself.

use async_trait::async_trait;
use ballot_domain::ExecutionContext;
use thiserror::Error;

/// Errors from running an action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Failed to start action: {0}")]
    Spawn(String),

    #[error("Action timed out after {0}s")]
    Timeout(u64),

    #[error("Action rejected: {0}")]
    Rejected(String),
}

/// Port for action execution
///
/// Implementations (adapters) live in the infrastructure layer.
/// `Ok` carries the action's exit code; `0` means success.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, payload: &str, context: &ExecutionContext)
    -> Result<i32, ExecutorError>;
}
