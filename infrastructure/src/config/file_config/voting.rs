//! Voting configuration from TOML (`[voting]` section)

use ballot_domain::{ConfigIssue, VotingPolicy};
use serde::{Deserialize, Serialize};

/// Raw voting configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// Seconds before an open ballot times out (10-300)
    pub timeout_secs: u64,
    /// Participants required online to open a ballot (1-100)
    pub minimum_voters: usize,
    /// Cast votes required for a ballot to be valid (1-100)
    pub minimum_votes_required: usize,
    /// Required YES share (0.5 = 50%, 0.66 = 66%)
    pub approval_threshold: f64,
    /// Require more than half of eligible voters to cast a vote
    pub require_majority_participation: bool,
    /// Count non-responders as NO votes
    pub count_abstentions_as_no: bool,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        let policy = VotingPolicy::default();
        Self {
            timeout_secs: policy.vote_timeout_secs,
            minimum_voters: policy.minimum_voters,
            minimum_votes_required: policy.minimum_votes_required,
            approval_threshold: policy.approval_threshold,
            require_majority_participation: policy.require_majority_participation,
            count_abstentions_as_no: policy.count_abstentions_as_no,
        }
    }
}

impl FileVotingConfig {
    /// Resolve into a policy. Out-of-range values fall back to their default
    /// and are reported as warnings.
    pub fn to_policy(&self) -> (VotingPolicy, Vec<ConfigIssue>) {
        let raw = VotingPolicy {
            vote_timeout_secs: self.timeout_secs,
            minimum_voters: self.minimum_voters,
            minimum_votes_required: self.minimum_votes_required,
            approval_threshold: self.approval_threshold,
            require_majority_participation: self.require_majority_participation,
            count_abstentions_as_no: self.count_abstentions_as_no,
        };
        let (policy, mut issues) = raw.sanitized();
        issues.extend(policy.validate());
        (policy, issues)
    }
}
