//! Executor configuration from TOML (`[executor]` section)

use crate::executor::ExecutorMode;
use ballot_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw executor configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// "dry-run" or "shell"
    pub mode: String,
    /// Shell used in shell mode
    pub shell: String,
    /// Seconds an action may run before it is killed
    pub timeout_secs: u64,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            mode: "dry-run".to_string(),
            shell: "sh".to_string(),
            timeout_secs: 30,
        }
    }
}

impl FileExecutorConfig {
    /// Parse mode string into ExecutorMode
    ///
    /// Accepts: "dry-run", "dry_run", "dryrun", "shell", "sh"
    pub fn parse_mode(&self) -> (ExecutorMode, Vec<ConfigIssue>) {
        match self.mode.parse::<ExecutorMode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "executor.mode".to_string(),
                        value: self.mode.clone(),
                        valid_values: vec!["dry-run".to_string(), "shell".to_string()],
                    },
                    format!(
                        "executor.mode: unknown value '{}', falling back to 'dry-run'",
                        self.mode
                    ),
                );
                (ExecutorMode::default(), vec![issue])
            }
        }
    }
}
