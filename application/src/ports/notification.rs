//! Notification port
//!
//! Defines the push channel for human-readable ballot notices.

use ballot_domain::ParticipantId;

/// Port for delivering notices to participants
///
/// Delivery is best-effort: implementations must not block for long and
/// never report failures back to the engine.
pub trait NotificationSink: Send + Sync {
    /// Deliver `text` to every participant in `recipients`
    fn broadcast(&self, recipients: &[ParticipantId], text: &str);

    /// Deliver `text` to a single participant
    fn notify(&self, recipient: &ParticipantId, text: &str) {
        self.broadcast(std::slice::from_ref(recipient), text);
    }
}

/// No-op sink for when nobody is listening
pub struct NoNotifications;

impl NotificationSink for NoNotifications {
    fn broadcast(&self, _recipients: &[ParticipantId], _text: &str) {}
}
