//! Membership port
//!
//! Supplies the participants currently present. The roster is read when a
//! ballot opens (to fix its eligible voters) and whenever a notice is
//! fanned out to everyone online.

use ballot_domain::{Participant, ParticipantId};

pub trait MembershipSource: Send + Sync {
    /// Participants currently online
    fn current_roster(&self) -> Vec<Participant>;

    /// Whether `id` may run gated commands without a ballot
    fn is_privileged(&self, _id: &ParticipantId) -> bool {
        false
    }

    /// Ids of everyone currently online
    fn current_ids(&self) -> Vec<ParticipantId> {
        self.current_roster()
            .into_iter()
            .map(|p| p.id().clone())
            .collect()
    }
}

/// Membership that can be changed at runtime (join/leave)
pub trait RosterRegistry: MembershipSource {
    /// Add a participant. Returns `false` if the id is already online.
    fn join(&self, participant: Participant, privileged: bool) -> bool;

    /// Remove a participant, returning them if they were online
    fn leave(&self, id: &ParticipantId) -> Option<Participant>;

    fn find(&self, id: &ParticipantId) -> Option<Participant>;

    /// Online participants with their privilege flag, in join order
    fn members(&self) -> Vec<(Participant, bool)>;
}
