//! Gated execution
//!
//! [`GatedExecutor`] wraps an [`ActionExecutor`] and refuses gated commands
//! unless the actor is privileged or the context carries a matching ballot
//! approval. The engine hands approved actions to it with that approval, so
//! an approved command passes the gate without any shared flag.

use crate::ports::action_executor::{ActionExecutor, ExecutorError};
use crate::ports::membership::MembershipSource;
use async_trait::async_trait;
use ballot_domain::{CommandGate, ExecutionContext, GateDecision};
use std::sync::Arc;
use tracing::debug;

pub struct GatedExecutor {
    inner: Arc<dyn ActionExecutor>,
    gate: Arc<CommandGate>,
    membership: Arc<dyn MembershipSource>,
}

impl GatedExecutor {
    pub fn new(
        inner: Arc<dyn ActionExecutor>,
        gate: Arc<CommandGate>,
        membership: Arc<dyn MembershipSource>,
    ) -> Self {
        Self {
            inner,
            gate,
            membership,
        }
    }

    /// Gate verdict for `payload` in `context`
    pub fn evaluate(&self, payload: &str, context: &ExecutionContext) -> GateDecision {
        let privileged = self.membership.is_privileged(context.actor.id());
        self.gate.evaluate(payload, privileged, context)
    }
}

#[async_trait]
impl ActionExecutor for GatedExecutor {
    async fn execute(
        &self,
        payload: &str,
        context: &ExecutionContext,
    ) -> Result<i32, ExecutorError> {
        match self.evaluate(payload, context) {
            GateDecision::RequireVote => Err(ExecutorError::Rejected(format!(
                "'{}' requires a vote",
                CommandGate::command_name(payload).unwrap_or(payload)
            ))),
            decision => {
                debug!("Gate {:?} for '{}' by {}", decision, payload, context.actor.id());
                self.inner.execute(payload, context).await
            }
        }
    }
}
