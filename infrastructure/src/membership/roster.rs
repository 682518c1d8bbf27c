//! In-memory roster of connected participants.

use ballot_application::{MembershipSource, RosterRegistry};
use ballot_domain::{Participant, ParticipantId};
use std::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct Member {
    participant: Participant,
    privileged: bool,
}

/// Participants currently online, in join order
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    members: RwLock<Vec<Member>>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Member>> {
        self.members.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl MembershipSource for InMemoryRoster {
    fn current_roster(&self) -> Vec<Participant> {
        self.read().iter().map(|m| m.participant.clone()).collect()
    }

    fn is_privileged(&self, id: &ParticipantId) -> bool {
        self.read()
            .iter()
            .any(|m| m.privileged && m.participant.id() == id)
    }
}

impl RosterRegistry for InMemoryRoster {
    fn join(&self, participant: Participant, privileged: bool) -> bool {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        if members.iter().any(|m| m.participant.id() == participant.id()) {
            return false;
        }
        debug!("{} joined{}", participant.id(), if privileged { " (op)" } else { "" });
        members.push(Member {
            participant,
            privileged,
        });
        true
    }

    fn leave(&self, id: &ParticipantId) -> Option<Participant> {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        let index = members.iter().position(|m| m.participant.id() == id)?;
        debug!("{} left", id);
        Some(members.remove(index).participant)
    }

    fn find(&self, id: &ParticipantId) -> Option<Participant> {
        self.read()
            .iter()
            .find(|m| m.participant.id() == id)
            .map(|m| m.participant.clone())
    }

    fn members(&self) -> Vec<(Participant, bool)> {
        self.read()
            .iter()
            .map(|m| (m.participant.clone(), m.privileged))
            .collect()
    }
}
