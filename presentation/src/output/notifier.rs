//! Terminal notification sink

use crate::output::console::ConsoleFormatter;
use crate::output::formatter::NoticeFormatter;
use ballot_application::NotificationSink;
use ballot_domain::ParticipantId;

/// Prints every notice to stdout, prefixed with its recipients.
///
/// Stands in for a real chat channel when the host console simulates the
/// participants.
pub struct ConsoleNotifier {
    formatter: Box<dyn NoticeFormatter>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::with_formatter(Box::new(ConsoleFormatter))
    }

    pub fn with_formatter(formatter: Box<dyn NoticeFormatter>) -> Self {
        Self { formatter }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for ConsoleNotifier {
    fn broadcast(&self, recipients: &[ParticipantId], text: &str) {
        if recipients.is_empty() {
            return;
        }
        println!("{}", self.formatter.format_notice(recipients, text));
    }
}
