//! Gating configuration from TOML (`[gating]` section)

use ballot_domain::{CommandGate, ConfigIssue, ConfigIssueCode, DEFAULT_GATED_COMMANDS};
use serde::{Deserialize, Serialize};

/// Raw gating configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatingConfig {
    /// Commands that require a vote when used by non-privileged participants
    pub commands: Vec<String>,
}

impl Default for FileGatingConfig {
    fn default() -> Self {
        Self {
            commands: DEFAULT_GATED_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl FileGatingConfig {
    pub fn to_gate(&self) -> (CommandGate, Vec<ConfigIssue>) {
        let gate = CommandGate::new(&self.commands);
        let mut issues = Vec::new();
        if gate.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyGateList,
                "gating.commands is empty; no command will ever be put to a vote",
            ));
        }
        (gate, issues)
    }
}
