//! Action executors
//!
//! - [`DryRunExecutor`] logs what would run and reports success
//! - [`ShellExecutor`] runs the payload through a shell

mod dry_run;
mod shell;

pub use dry_run::DryRunExecutor;
pub use shell::ShellExecutor;

use crate::config::FileExecutorConfig;
use ballot_application::ActionExecutor;
use ballot_domain::ConfigIssue;
use std::sync::Arc;
use std::time::Duration;

/// How approved actions are run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutorMode {
    #[default]
    DryRun,
    Shell,
}

impl ExecutorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutorMode::DryRun => "dry-run",
            ExecutorMode::Shell => "shell",
        }
    }
}

impl std::fmt::Display for ExecutorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExecutorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dry-run" | "dry_run" | "dryrun" => Ok(ExecutorMode::DryRun),
            "shell" | "sh" => Ok(ExecutorMode::Shell),
            other => Err(format!("unknown executor mode: {}", other)),
        }
    }
}

/// Build the executor selected by `config`.
pub fn executor_from_config(
    config: &FileExecutorConfig,
) -> (Arc<dyn ActionExecutor>, Vec<ConfigIssue>) {
    let (mode, issues) = config.parse_mode();
    let executor: Arc<dyn ActionExecutor> = match mode {
        ExecutorMode::DryRun => Arc::new(DryRunExecutor::new()),
        ExecutorMode::Shell => Arc::new(
            ShellExecutor::new(&config.shell)
                .with_timeout(Duration::from_secs(config.timeout_secs.max(1))),
        ),
    };
    (executor, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("dry_run".parse::<ExecutorMode>(), Ok(ExecutorMode::DryRun));
        assert_eq!("SH".parse::<ExecutorMode>(), Ok(ExecutorMode::Shell));
        assert!("ssh".parse::<ExecutorMode>().is_err());
        assert_eq!(ExecutorMode::Shell.to_string(), "shell");
    }
}
