//! Participant-facing notice texts
//!
//! Every message the engine sends to participants or writes into the audit
//! log is built here, so wording stays consistent across sinks.

use super::decision::Decision;
use super::entities::{Ballot, CastOutcome, ConcludedBallot, Tally};
use crate::core::participant::ParticipantId;
use crate::policy::VotingPolicy;

/// Separator written after each audit entry
pub const AUDIT_SEPARATOR: &str = "----------------------------------------";

/// Templates for the notices sent during a ballot's lifecycle
pub struct NoticeTemplate;

impl NoticeTemplate {
    /// Broadcast when a ballot opens
    pub fn initiated(initiator_name: &str, payload: &str, policy: &VotingPolicy) -> String {
        format!(
            "===== VOTE INITIATED =====\n\
             {} wants to execute:\n\
             {}\n\
             Vote using: /yes or /no\n\
             Vote expires in {} seconds\n\
             Required: {}% approval, minimum {} votes",
            initiator_name,
            payload,
            policy.vote_timeout_secs,
            policy.threshold_percent(),
            policy.minimum_votes_required
        )
    }

    /// Broadcast after each vote that does not conclude the ballot
    pub fn status_update(tally: &Tally, seconds_remaining: u64) -> String {
        format!(
            "Vote status: {} YES | {} NO | {} not voted ({}s remaining)",
            tally.yes, tally.no, tally.not_voted, seconds_remaining
        )
    }

    /// One entry of a status query
    pub fn status_report(payload: &str, tally: &Tally, seconds_remaining: u64) -> String {
        format!(
            "=== CURRENT VOTE STATUS ===\n\
             Command: {}\n\
             YES: {} | NO: {} | Not voted: {}\n\
             Time remaining: {} seconds",
            payload, tally.yes, tally.no, tally.not_voted, seconds_remaining
        )
    }

    pub fn no_active_votes() -> &'static str {
        "No active votes."
    }

    /// Private confirmation for the voter
    pub fn cast_confirmation(outcome: &CastOutcome) -> String {
        if outcome.changed {
            format!("You changed your vote to {}", outcome.choice)
        } else {
            format!("You voted {}", outcome.choice)
        }
    }

    pub fn no_active_ballot() -> &'static str {
        "No active vote found."
    }

    pub fn already_active() -> &'static str {
        "You already have an active vote. Please wait for it to complete."
    }

    pub fn too_few_online(required: usize, online: usize) -> String {
        format!(
            "Not enough players online to vote. Minimum required: {}, Currently online: {}",
            required, online
        )
    }

    /// Broadcast when a ballot concludes
    pub fn result(ballot: &ConcludedBallot, decision: &Decision) -> String {
        let tally = ballot.tally();
        let mut text = format!(
            "===== VOTE CONCLUDED =====\n\
             Command: {}\n\
             YES: {} | NO: {} | Abstained: {}\n",
            ballot.action_payload(),
            tally.yes,
            tally.no,
            tally.not_voted
        );
        if let Some(reason) = &decision.reason {
            text.push_str(&reason.to_string());
            text.push('\n');
        }
        text.push_str(if decision.passed {
            "✓ VOTE PASSED"
        } else {
            "✗ VOTE FAILED"
        });
        text
    }

    /// Broadcast when the approved action reports success
    pub fn execution_succeeded() -> &'static str {
        "Command executed successfully!"
    }

    /// Sent to the initiator when the action ran but reported failure
    pub fn execution_unsuccessful(exit_code: i32) -> String {
        format!(
            "Command returned no success value (exit code {}). Possible syntax issue.",
            exit_code
        )
    }

    /// Sent to the initiator when the action could not run
    pub fn execution_failed(error: &str) -> String {
        format!("Error executing command: {}", error)
    }

    /// Audit body for a freshly opened ballot
    pub fn audit_opened(ballot: &Ballot) -> String {
        audit_body(ballot, &[], "PENDING")
    }

    /// Audit body with the full per-voter breakdown
    pub fn audit_concluded(ballot: &ConcludedBallot, decision: &Decision) -> String {
        let abstained: Vec<&ParticipantId> = ballot.abstained().collect();
        audit_body(ballot.ballot(), &abstained, decision.status_tag())
    }
}

fn audit_body(ballot: &Ballot, abstained: &[&ParticipantId], result: &str) -> String {
    let names = |ids: Vec<&ParticipantId>| -> String {
        ids.iter()
            .map(|id| ballot.display_name(id))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let yes: Vec<_> = ballot.yes_votes().collect();
    let no: Vec<_> = ballot.no_votes().collect();

    format!(
        "Command: {}\n\
         Initiator: {}\n\
         YES votes ({}): {}\n\
         NO votes ({}): {}\n\
         Abstained ({}): {}\n\
         Result: {}",
        ballot.action_payload(),
        ballot.initiator().display_name(),
        yes.len(),
        names(yes),
        no.len(),
        names(no),
        abstained.len(),
        names(abstained.to_vec()),
        result
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::decision::decide;
    use crate::ballot::entities::VoteChoice;
    use crate::core::participant::Participant;
    use std::time::{Duration, Instant};

    fn ballot() -> Ballot {
        let roster = vec![
            Participant::new("u-1", "Alice"),
            Participant::new("u-2", "Bob"),
            Participant::new("u-3", "Carol"),
        ];
        Ballot::new(
            roster[0].clone(),
            "/weather clear",
            roster,
            Instant::now(),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn test_initiated_mentions_requirements() {
        let policy = VotingPolicy::default().with_approval_threshold(0.66);
        let text = NoticeTemplate::initiated("Alice", "/weather clear", &policy);
        assert!(text.starts_with("===== VOTE INITIATED ====="));
        assert!(text.contains("Alice wants to execute:\n/weather clear"));
        assert!(text.contains("Vote expires in 30 seconds"));
        assert!(text.contains("Required: 66% approval, minimum 2 votes"));
    }

    #[test]
    fn test_status_update() {
        let tally = Tally {
            yes: 1,
            no: 2,
            not_voted: 3,
        };
        assert_eq!(
            NoticeTemplate::status_update(&tally, 12),
            "Vote status: 1 YES | 2 NO | 3 not voted (12s remaining)"
        );
    }

    #[test]
    fn test_cast_confirmation() {
        let first = CastOutcome {
            choice: VoteChoice::Yes,
            changed: false,
            concluded: false,
        };
        let changed = CastOutcome {
            choice: VoteChoice::No,
            changed: true,
            concluded: false,
        };
        assert_eq!(NoticeTemplate::cast_confirmation(&first), "You voted YES");
        assert_eq!(
            NoticeTemplate::cast_confirmation(&changed),
            "You changed your vote to NO"
        );
    }

    #[test]
    fn test_result_includes_reason_on_failure() {
        let mut b = ballot();
        b.cast(&"u-1".into(), VoteChoice::Yes).unwrap();
        let concluded = b.conclude(Instant::now());
        let decision = decide(&concluded, &VotingPolicy::default());

        let text = NoticeTemplate::result(&concluded, &decision);
        assert!(text.contains("YES: 1 | NO: 0 | Abstained: 2"));
        assert!(text.contains("Insufficient votes: 1/2 required"));
        assert!(text.ends_with("✗ VOTE FAILED"));
    }

    #[test]
    fn test_result_passed_has_no_reason() {
        let mut b = ballot();
        b.cast(&"u-1".into(), VoteChoice::Yes).unwrap();
        b.cast(&"u-2".into(), VoteChoice::No).unwrap();
        let concluded = b.conclude(Instant::now());
        let decision = decide(&concluded, &VotingPolicy::default());

        let text = NoticeTemplate::result(&concluded, &decision);
        assert!(!text.contains("Insufficient"));
        assert!(text.ends_with("✓ VOTE PASSED"));
    }

    #[test]
    fn test_audit_concluded_breakdown_uses_display_names() {
        let mut b = ballot();
        b.cast(&"u-1".into(), VoteChoice::Yes).unwrap();
        b.cast(&"u-2".into(), VoteChoice::Yes).unwrap();
        let concluded = b.conclude(Instant::now());
        let decision = decide(&concluded, &VotingPolicy::default());

        let body = NoticeTemplate::audit_concluded(&concluded, &decision);
        assert_eq!(
            body,
            "Command: /weather clear\n\
             Initiator: Alice\n\
             YES votes (2): Alice, Bob\n\
             NO votes (0): \n\
             Abstained (1): Carol\n\
             Result: PASSED"
        );
    }

    #[test]
    fn test_audit_opened_is_pending() {
        let body = NoticeTemplate::audit_opened(&ballot());
        assert!(body.contains("Abstained (0): "));
        assert!(body.ends_with("Result: PENDING"));
    }
}
