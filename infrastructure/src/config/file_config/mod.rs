//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and resolved into domain types on demand.

mod audit;
mod executor;
mod gating;
mod sweep;
mod voting;

pub use audit::FileAuditConfig;
pub use executor::FileExecutorConfig;
pub use gating::FileGatingConfig;
pub use sweep::FileSweepConfig;
pub use voting::FileVotingConfig;

use ballot_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Ballot policy
    pub voting: FileVotingConfig,
    /// Commands that need a vote
    pub gating: FileGatingConfig,
    /// Audit log settings
    pub audit: FileAuditConfig,
    /// How approved actions run
    pub executor: FileExecutorConfig,
    /// Expiry sweep settings
    pub sweep: FileSweepConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Voting policy ranges and consistency
    /// 2. An empty gate list
    /// 3. Enum parse failures for executor.mode
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.voting.to_policy().1);
        issues.extend(self.gating.to_gate().1);
        issues.extend(self.executor.parse_mode().1);
        issues
    }
}
