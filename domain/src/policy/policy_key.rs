//! Policy key registry for runtime policy changes.
//!
//! Defines the dotted keys under which each [`VotingPolicy`] field is
//! exposed, with a description and a parser that applies a raw string value.
//! Used by the runtime policy accessor and the host console's `/set`.

use super::voting_policy::{
    APPROVAL_THRESHOLD_RANGE, MINIMUM_VOTERS_RANGE, MINIMUM_VOTES_RANGE, VOTE_TIMEOUT_RANGE,
    VotingPolicy,
};

/// A runtime-settable policy field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKey {
    VoteTimeoutSecs,
    MinimumVoters,
    MinimumVotesRequired,
    ApprovalThreshold,
    RequireMajorityParticipation,
    CountAbstentionsAsNo,
}

impl PolicyKey {
    pub const ALL: [PolicyKey; 6] = [
        PolicyKey::VoteTimeoutSecs,
        PolicyKey::MinimumVoters,
        PolicyKey::MinimumVotesRequired,
        PolicyKey::ApprovalThreshold,
        PolicyKey::RequireMajorityParticipation,
        PolicyKey::CountAbstentionsAsNo,
    ];

    /// Dotted key path (matches the `[voting]` config section).
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKey::VoteTimeoutSecs => "voting.timeout_secs",
            PolicyKey::MinimumVoters => "voting.minimum_voters",
            PolicyKey::MinimumVotesRequired => "voting.minimum_votes_required",
            PolicyKey::ApprovalThreshold => "voting.approval_threshold",
            PolicyKey::RequireMajorityParticipation => "voting.require_majority_participation",
            PolicyKey::CountAbstentionsAsNo => "voting.count_abstentions_as_no",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PolicyKey::VoteTimeoutSecs => "Seconds before an open ballot times out (10-300)",
            PolicyKey::MinimumVoters => "Participants required online to open a ballot (1-100)",
            PolicyKey::MinimumVotesRequired => {
                "Cast votes required for a ballot to be valid (1-100)"
            }
            PolicyKey::ApprovalThreshold => "Required YES share, 0.0-1.0 (0.5 = 50%)",
            PolicyKey::RequireMajorityParticipation => {
                "Require more than half of eligible voters to cast a vote"
            }
            PolicyKey::CountAbstentionsAsNo => "Count non-responders as NO votes",
        }
    }

    /// Current value of this key in `policy`, rendered as text.
    pub fn read(&self, policy: &VotingPolicy) -> String {
        match self {
            PolicyKey::VoteTimeoutSecs => policy.vote_timeout_secs.to_string(),
            PolicyKey::MinimumVoters => policy.minimum_voters.to_string(),
            PolicyKey::MinimumVotesRequired => policy.minimum_votes_required.to_string(),
            PolicyKey::ApprovalThreshold => policy.approval_threshold.to_string(),
            PolicyKey::RequireMajorityParticipation => {
                policy.require_majority_participation.to_string()
            }
            PolicyKey::CountAbstentionsAsNo => policy.count_abstentions_as_no.to_string(),
        }
    }

    /// Parse `raw` and return a copy of `policy` with this key changed.
    ///
    /// Out-of-range values are rejected rather than corrected.
    pub fn apply(&self, policy: VotingPolicy, raw: &str) -> Result<VotingPolicy, String> {
        let raw = raw.trim();
        match self {
            PolicyKey::VoteTimeoutSecs => {
                let v: u64 = parse_number(raw)?;
                check_range(v, &VOTE_TIMEOUT_RANGE)?;
                Ok(policy.with_vote_timeout_secs(v))
            }
            PolicyKey::MinimumVoters => {
                let v: usize = parse_number(raw)?;
                check_range(v, &MINIMUM_VOTERS_RANGE)?;
                Ok(policy.with_minimum_voters(v))
            }
            PolicyKey::MinimumVotesRequired => {
                let v: usize = parse_number(raw)?;
                check_range(v, &MINIMUM_VOTES_RANGE)?;
                Ok(policy.with_minimum_votes_required(v))
            }
            PolicyKey::ApprovalThreshold => {
                let v: f64 = parse_number(raw)?;
                check_range(v, &APPROVAL_THRESHOLD_RANGE)?;
                Ok(policy.with_approval_threshold(v))
            }
            PolicyKey::RequireMajorityParticipation => {
                Ok(policy.with_majority_participation(parse_bool(raw)?))
            }
            PolicyKey::CountAbstentionsAsNo => Ok(policy.with_abstentions_as_no(parse_bool(raw)?)),
        }
    }
}

impl std::fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PolicyKey {
    type Err = String;

    /// Accepts the dotted path or the bare field name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let bare = key.strip_prefix("voting.").unwrap_or(&key);
        PolicyKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().trim_start_matches("voting.") == bare)
            .ok_or_else(|| format!("unknown policy key: {}", s))
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("'{}' is not a valid number", raw))
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(format!("'{}' is not a boolean (true/false)", raw)),
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    range: &std::ops::RangeInclusive<T>,
) -> Result<(), String> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} is outside {}..={}",
            value,
            range.start(),
            range.end()
        ))
    }
}
