//! Submit command use case
//!
//! Entry point for a command attempted by a participant: commands the gate
//! lets through run directly, gated ones open a ballot instead.

use super::vote_engine::{BallotHandle, InitiationError, VoteEngine};
use crate::ports::action_executor::{ActionExecutor, ExecutorError};
use crate::use_cases::gated_execution::GatedExecutor;
use ballot_domain::{ExecutionContext, GateDecision, Participant};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when submitting a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Command is empty")]
    Empty,

    #[error(transparent)]
    Initiation(#[from] InitiationError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// What happened to a submitted command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Ran directly with this exit code
    Executed(i32),
    /// Went to a ballot
    BallotOpened(BallotHandle),
}

pub struct SubmitCommandUseCase {
    engine: Arc<VoteEngine>,
    executor: Arc<GatedExecutor>,
}

impl SubmitCommandUseCase {
    pub fn new(engine: Arc<VoteEngine>, executor: Arc<GatedExecutor>) -> Self {
        Self { engine, executor }
    }

    pub async fn execute(
        &self,
        actor: &Participant,
        command: &str,
    ) -> Result<SubmitOutcome, SubmitError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(SubmitError::Empty);
        }

        let context = ExecutionContext::direct(actor.clone());
        match self.executor.evaluate(command, &context) {
            GateDecision::RequireVote => {
                info!("{} needs a vote for '{}'", actor.id(), command);
                let handle = self.engine.initiate_from_roster(actor, command)?;
                Ok(SubmitOutcome::BallotOpened(handle))
            }
            _ => {
                let code = self.executor.execute(command, &context).await?;
                Ok(SubmitOutcome::Executed(code))
            }
        }
    }
}
