//! Voting policy
//!
//! - [`voting_policy::VotingPolicy`]: the resolved tunables
//! - [`policy_key::PolicyKey`]: runtime-settable keys
//! - [`validation`]: structured configuration issues

pub mod policy_key;
pub mod validation;
pub mod voting_policy;

pub use policy_key::PolicyKey;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
pub use voting_policy::VotingPolicy;
