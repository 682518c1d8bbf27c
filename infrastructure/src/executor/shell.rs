//! Shell executor: runs the payload with `<shell> -c`.
//!
//! A leading `/` (chat command prefix) is dropped before running. The
//! initiator is exported as `BALLOT_INITIATOR` and `BALLOT_INITIATOR_NAME`,
//! and `BALLOT_APPROVED` is `1` when a ballot approved the action.

use async_trait::async_trait;
use ballot_application::{ActionExecutor, ExecutorError};
use ballot_domain::ExecutionContext;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default timeout for an action (30 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct ShellExecutor {
    shell: String,
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new("sh")
    }
}

#[async_trait]
impl ActionExecutor for ShellExecutor {
    async fn execute(
        &self,
        payload: &str,
        context: &ExecutionContext,
    ) -> Result<i32, ExecutorError> {
        let script = payload.trim().strip_prefix('/').unwrap_or(payload.trim());

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(script)
            .env("BALLOT_INITIATOR", context.actor.id().as_str())
            .env("BALLOT_INITIATOR_NAME", context.actor.display_name())
            .env("BALLOT_APPROVED", if context.is_approved() { "1" } else { "0" })
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| ExecutorError::Spawn(format!("{}: {}", self.shell, e)))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ExecutorError::Spawn(e.to_string()))?,
            Err(_) => {
                warn!("Action '{}' timed out after {:?}", script, self.timeout);
                return Err(ExecutorError::Timeout(self.timeout.as_secs()));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            debug!("stdout: {}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            debug!("stderr: {}", stderr.trim_end());
        }

        // Killed by a signal: no exit code
        Ok(output.status.code().unwrap_or(-1))
    }
}
