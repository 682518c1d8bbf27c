//! Voting policy value object
//!
//! [`VotingPolicy`] is the resolved snapshot of every tunable that affects
//! ballot creation and tallying. It is a plain `Copy` value: callers read a
//! fresh snapshot for each decision and never hold a reference to shared
//! configuration while tallying.

use super::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Accepted range for [`VotingPolicy::vote_timeout_secs`]
pub const VOTE_TIMEOUT_RANGE: RangeInclusive<u64> = 10..=300;
/// Accepted range for [`VotingPolicy::minimum_voters`]
pub const MINIMUM_VOTERS_RANGE: RangeInclusive<usize> = 1..=100;
/// Accepted range for [`VotingPolicy::minimum_votes_required`]
pub const MINIMUM_VOTES_RANGE: RangeInclusive<usize> = 1..=100;
/// Accepted range for [`VotingPolicy::approval_threshold`]
pub const APPROVAL_THRESHOLD_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Ballot policy
///
/// # Example
///
/// ```
/// use ballot_domain::VotingPolicy;
///
/// let policy = VotingPolicy::default()
///     .with_approval_threshold(0.66)
///     .with_minimum_voters(3)
///     .with_minimum_votes_required(3);
/// assert!(policy.validate().is_empty());
/// assert_eq!(policy.vote_timeout().as_secs(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VotingPolicy {
    /// Seconds a ballot stays open before it is concluded by the sweep.
    pub vote_timeout_secs: u64,
    /// Participants that must be online to open a ballot.
    pub minimum_voters: usize,
    /// Cast (non-abstaining) votes needed for a ballot to be valid.
    pub minimum_votes_required: usize,
    /// Required YES share of the effective total (inclusive).
    pub approval_threshold: f64,
    /// Require cast votes to exceed half of the eligible voters.
    pub require_majority_participation: bool,
    /// Count non-responders as NO when computing approval.
    pub count_abstentions_as_no: bool,
}

impl Default for VotingPolicy {
    fn default() -> Self {
        Self {
            vote_timeout_secs: 30,
            minimum_voters: 2,
            minimum_votes_required: 2,
            approval_threshold: 0.5,
            require_majority_participation: true,
            count_abstentions_as_no: false,
        }
    }
}

impl VotingPolicy {
    // ==================== Builder Methods ====================

    pub fn with_vote_timeout_secs(mut self, secs: u64) -> Self {
        self.vote_timeout_secs = secs;
        self
    }

    pub fn with_minimum_voters(mut self, n: usize) -> Self {
        self.minimum_voters = n;
        self
    }

    pub fn with_minimum_votes_required(mut self, n: usize) -> Self {
        self.minimum_votes_required = n;
        self
    }

    pub fn with_approval_threshold(mut self, threshold: f64) -> Self {
        self.approval_threshold = threshold;
        self
    }

    pub fn with_majority_participation(mut self, required: bool) -> Self {
        self.require_majority_participation = required;
        self
    }

    pub fn with_abstentions_as_no(mut self, count: bool) -> Self {
        self.count_abstentions_as_no = count;
        self
    }

    // ==================== Accessors ====================

    pub fn vote_timeout(&self) -> Duration {
        Duration::from_secs(self.vote_timeout_secs)
    }

    /// Approval threshold as a whole percentage (for display)
    pub fn threshold_percent(&self) -> u32 {
        (self.approval_threshold * 100.0).round() as u32
    }

    // ==================== Validation ====================

    /// Check every field against its accepted range.
    ///
    /// Returns an empty list for a valid policy.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !VOTE_TIMEOUT_RANGE.contains(&self.vote_timeout_secs) {
            issues.push(out_of_range(
                "voting.timeout_secs",
                self.vote_timeout_secs,
                &VOTE_TIMEOUT_RANGE,
            ));
        }
        if !MINIMUM_VOTERS_RANGE.contains(&self.minimum_voters) {
            issues.push(out_of_range(
                "voting.minimum_voters",
                self.minimum_voters,
                &MINIMUM_VOTERS_RANGE,
            ));
        }
        if !MINIMUM_VOTES_RANGE.contains(&self.minimum_votes_required) {
            issues.push(out_of_range(
                "voting.minimum_votes_required",
                self.minimum_votes_required,
                &MINIMUM_VOTES_RANGE,
            ));
        }
        if !APPROVAL_THRESHOLD_RANGE.contains(&self.approval_threshold) {
            issues.push(out_of_range(
                "voting.approval_threshold",
                self.approval_threshold,
                &APPROVAL_THRESHOLD_RANGE,
            ));
        }

        if issues.is_empty() && self.minimum_votes_required > self.minimum_voters {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnreachableMinimumVotes {
                    required: self.minimum_votes_required,
                    minimum_voters: self.minimum_voters,
                },
                format!(
                    "voting.minimum_votes_required ({}) exceeds voting.minimum_voters ({}); \
                     ballots opened with few participants can never pass",
                    self.minimum_votes_required, self.minimum_voters
                ),
            ));
        }

        issues
    }

    /// Replace every out-of-range field with its default value.
    ///
    /// Returns the corrected policy together with the issues that caused a
    /// correction (range warnings only).
    pub fn sanitized(self) -> (Self, Vec<ConfigIssue>) {
        let defaults = Self::default();
        let mut policy = self;
        let mut issues = Vec::new();

        if !VOTE_TIMEOUT_RANGE.contains(&policy.vote_timeout_secs) {
            issues.push(out_of_range(
                "voting.timeout_secs",
                policy.vote_timeout_secs,
                &VOTE_TIMEOUT_RANGE,
            ));
            policy.vote_timeout_secs = defaults.vote_timeout_secs;
        }
        if !MINIMUM_VOTERS_RANGE.contains(&policy.minimum_voters) {
            issues.push(out_of_range(
                "voting.minimum_voters",
                policy.minimum_voters,
                &MINIMUM_VOTERS_RANGE,
            ));
            policy.minimum_voters = defaults.minimum_voters;
        }
        if !MINIMUM_VOTES_RANGE.contains(&policy.minimum_votes_required) {
            issues.push(out_of_range(
                "voting.minimum_votes_required",
                policy.minimum_votes_required,
                &MINIMUM_VOTES_RANGE,
            ));
            policy.minimum_votes_required = defaults.minimum_votes_required;
        }
        if !APPROVAL_THRESHOLD_RANGE.contains(&policy.approval_threshold) {
            issues.push(out_of_range(
                "voting.approval_threshold",
                policy.approval_threshold,
                &APPROVAL_THRESHOLD_RANGE,
            ));
            policy.approval_threshold = defaults.approval_threshold;
        }

        (policy, issues)
    }
}

fn out_of_range<T: std::fmt::Display>(
    field: &str,
    value: T,
    range: &RangeInclusive<T>,
) -> ConfigIssue {
    let range_text = format!("{}..={}", range.start(), range.end());
    ConfigIssue::warning(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            range: range_text.clone(),
        },
        format!(
            "{}: value {} is outside {}, using the default",
            field, value, range_text
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let policy = VotingPolicy::default();
        assert_eq!(policy.vote_timeout_secs, 30);
        assert_eq!(policy.minimum_voters, 2);
        assert_eq!(policy.minimum_votes_required, 2);
        assert_eq!(policy.approval_threshold, 0.5);
        assert!(policy.require_majority_participation);
        assert!(!policy.count_abstentions_as_no);
        assert!(policy.validate().is_empty());
    }

    #[test]
    fn test_builder() {
        let policy = VotingPolicy::default()
            .with_vote_timeout_secs(120)
            .with_minimum_voters(5)
            .with_minimum_votes_required(3)
            .with_approval_threshold(0.66)
            .with_majority_participation(false)
            .with_abstentions_as_no(true);

        assert_eq!(policy.vote_timeout(), Duration::from_secs(120));
        assert_eq!(policy.minimum_voters, 5);
        assert_eq!(policy.threshold_percent(), 66);
        assert!(!policy.require_majority_participation);
        assert!(policy.count_abstentions_as_no);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let policy = VotingPolicy::default()
            .with_vote_timeout_secs(10)
            .with_minimum_voters(100)
            .with_minimum_votes_required(1)
            .with_approval_threshold(1.0);
        assert!(policy.validate().is_empty());

        let policy = policy.with_vote_timeout_secs(300).with_approval_threshold(0.0);
        assert!(policy.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_each_out_of_range_field() {
        let policy = VotingPolicy::default()
            .with_vote_timeout_secs(5)
            .with_minimum_voters(0)
            .with_minimum_votes_required(101)
            .with_approval_threshold(1.5);

        let issues = policy.validate();
        assert_eq!(issues.len(), 4);
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::OutOfRange { field, .. } if field == "voting.timeout_secs"
        )));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::OutOfRange { field, value, .. }
                if field == "voting.approval_threshold" && value == "1.5"
        )));
    }

    #[test]
    fn test_sanitized_falls_back_to_defaults() {
        let (policy, issues) = VotingPolicy::default()
            .with_vote_timeout_secs(1000)
            .with_approval_threshold(-0.1)
            .with_minimum_voters(4)
            .sanitized();

        assert_eq!(issues.len(), 2);
        assert_eq!(policy.vote_timeout_secs, 30);
        assert_eq!(policy.approval_threshold, 0.5);
        // In-range values are kept
        assert_eq!(policy.minimum_voters, 4);
    }

    #[test]
    fn test_unreachable_minimum_votes_warning() {
        let policy = VotingPolicy::default()
            .with_minimum_voters(2)
            .with_minimum_votes_required(3);
        let issues = policy.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::UnreachableMinimumVotes {
                required: 3,
                minimum_voters: 2
            }
        ));
    }

    #[test]
    fn test_raised_minimum_votes_is_reachable_with_matching_voters() {
        let policy = VotingPolicy::default()
            .with_approval_threshold(0.66)
            .with_minimum_voters(3)
            .with_minimum_votes_required(3);
        assert!(policy.validate().is_empty());
    }

    #[test]
    fn test_serde_roundtrip_field_names() {
        let json = serde_json::to_value(VotingPolicy::default()).unwrap();
        assert_eq!(json["vote_timeout_secs"], 30);
        assert_eq!(json["require_majority_participation"], true);
    }
}
