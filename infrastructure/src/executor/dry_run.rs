//! Dry-run executor: records and logs actions without running them.

use async_trait::async_trait;
use ballot_application::{ActionExecutor, ExecutorError};
use ballot_domain::ExecutionContext;
use std::sync::Mutex;
use tracing::info;

#[derive(Default)]
pub struct DryRunExecutor {
    history: Mutex<Vec<String>>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads "run" so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ActionExecutor for DryRunExecutor {
    async fn execute(
        &self,
        payload: &str,
        context: &ExecutionContext,
    ) -> Result<i32, ExecutorError> {
        info!(
            "[dry-run] {} runs '{}'{}",
            context.actor.id(),
            payload,
            if context.is_approved() {
                " (approved by vote)"
            } else {
                ""
            }
        );
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(payload.to_string());
        Ok(0)
    }
}
