//! Recording port implementations shared by the use case tests.

use crate::ports::action_executor::{ActionExecutor, ExecutorError};
use crate::ports::audit_log::{AuditError, AuditRecord, AuditSink, AuditTag};
use crate::ports::membership::MembershipSource;
use crate::ports::notification::NotificationSink;
use async_trait::async_trait;
use ballot_domain::{ExecutionContext, Participant, ParticipantId};
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::Semaphore;

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Vec<ParticipantId>, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(Vec<ParticipantId>, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Every text delivered to `who`, in order
    pub fn texts_for(&self, who: &ParticipantId) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(to, _)| to.contains(who))
            .map(|(_, text)| text)
            .collect()
    }
}

impl NotificationSink for RecordingNotifier {
    fn broadcast(&self, recipients: &[ParticipantId], text: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((recipients.to_vec(), text.to_string()));
    }
}

#[derive(Debug, Clone)]
pub struct Run {
    pub payload: String,
    pub actor: ParticipantId,
    pub approved: bool,
}

pub struct RecordingExecutor {
    result: Result<i32, ExecutorError>,
    runs: Mutex<Vec<Run>>,
}

impl RecordingExecutor {
    pub fn succeeding() -> Self {
        Self::exiting(0)
    }

    pub fn exiting(code: i32) -> Self {
        Self {
            result: Ok(code),
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(ExecutorError::Spawn(message.to_string())),
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn runs(&self) -> Vec<Run> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionExecutor for RecordingExecutor {
    async fn execute(
        &self,
        payload: &str,
        context: &ExecutionContext,
    ) -> Result<i32, ExecutorError> {
        self.runs.lock().unwrap().push(Run {
            payload: payload.to_string(),
            actor: context.actor.id().clone(),
            approved: context.is_approved(),
        });
        self.result.clone()
    }
}

/// Executor whose runs block until released
pub struct HeldExecutor {
    gate: Semaphore,
    payloads: Mutex<Vec<String>>,
}

impl HeldExecutor {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    /// Let every pending and future run finish
    pub fn release(&self) {
        self.gate.close();
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionExecutor for HeldExecutor {
    async fn execute(
        &self,
        payload: &str,
        _context: &ExecutionContext,
    ) -> Result<i32, ExecutorError> {
        self.payloads.lock().unwrap().push(payload.to_string());
        // Closing the semaphore wakes every waiter
        let _ = self.gate.acquire().await;
        Ok(0)
    }
}

#[derive(Default)]
pub struct RecordingAudit {
    records: Mutex<Vec<AuditRecord>>,
}

impl RecordingAudit {
    pub fn tags(&self) -> Vec<AuditTag> {
        self.records.lock().unwrap().iter().map(|r| r.tag).collect()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.summary.clone())
            .collect()
    }
}

impl AuditSink for RecordingAudit {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct FailingAudit;

impl AuditSink for FailingAudit {
    fn append(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Err(AuditError::Io(std::io::Error::other("disk full")))
    }
}

pub struct StaticRoster {
    roster: Vec<Participant>,
    privileged: HashSet<ParticipantId>,
}

impl StaticRoster {
    pub fn new(names: &[&str]) -> Self {
        Self {
            roster: names.iter().map(|n| Participant::named(n)).collect(),
            privileged: HashSet::new(),
        }
    }

    pub fn with_privileged(mut self, name: &str) -> Self {
        self.privileged.insert(ParticipantId::new(name));
        self
    }
}

impl MembershipSource for StaticRoster {
    fn current_roster(&self) -> Vec<Participant> {
        self.roster.clone()
    }

    fn is_privileged(&self, id: &ParticipantId) -> bool {
        self.privileged.contains(id)
    }
}
