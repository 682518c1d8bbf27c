//! Output formatter trait

use ballot_application::BallotStatus;
use ballot_domain::ParticipantId;

/// Trait for rendering engine output on a terminal
pub trait NoticeFormatter: Send + Sync {
    /// Format a notice delivered to `recipients`
    fn format_notice(&self, recipients: &[ParticipantId], text: &str) -> String;

    /// Format the open ballots for a status query
    fn format_status(&self, statuses: &[BallotStatus]) -> String;

    /// Format as JSON
    fn format_status_json(&self, statuses: &[BallotStatus]) -> String;
}
