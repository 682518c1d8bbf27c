//! Vote engine use case
//!
//! Drives a ballot from initiation through casting to conclusion. Ballots
//! conclude either when every eligible voter has cast a vote or when the
//! expiry sweep finds them past their timeout.
//!
//! All per-ballot mutation happens under the ballot's slot lock in plain
//! synchronous helpers. Notifications and auditing run after the lock is
//! released. Approved actions run on tracked background tasks, so neither
//! the last voter nor the sweep waits on the executor.

use crate::ports::action_executor::ActionExecutor;
use crate::ports::audit_log::{AuditRecord, AuditSink, AuditTag, NoAuditLog};
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::membership::MembershipSource;
use crate::ports::notification::NotificationSink;
use crate::ports::policy_source::PolicySource;
use crate::store::{BallotSlot, BallotStore};
use ballot_domain::{
    Ballot, BallotApproval, CastOutcome, ConcludedBallot, Decision, DomainError,
    ExecutionContext, NoticeTemplate, Participant, ParticipantId, Tally, VoteChoice, decide,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Errors that can occur when opening a ballot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitiationError {
    #[error("You already have an active vote. Please wait for it to complete.")]
    AlreadyActive,

    #[error("Not enough participants online: {online} of {required} required")]
    TooFewOnline { required: usize, online: usize },
}

/// Errors that can occur when casting a vote
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    #[error("No active vote found.")]
    NoActiveBallot,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Reference to a freshly opened ballot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotHandle {
    pub initiator: ParticipantId,
    pub payload: String,
    pub eligible: usize,
    pub timeout: Duration,
}

/// Snapshot of one open ballot for status queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BallotStatus {
    pub initiator: String,
    pub payload: String,
    pub yes: usize,
    pub no: usize,
    pub not_voted: usize,
    pub seconds_remaining: u64,
}

impl BallotStatus {
    pub fn tally(&self) -> Tally {
        Tally {
            yes: self.yes,
            no: self.no,
            not_voted: self.not_voted,
        }
    }
}

/// What a cast did to the ballot, decided under the slot lock
enum CastStep {
    Recorded {
        changed: bool,
        tally: Tally,
        seconds_remaining: u64,
    },
    Completed {
        changed: bool,
        concluded: ConcludedBallot,
    },
    /// Past its timeout: concluded without the vote
    Expired { concluded: ConcludedBallot },
}

/// Use case owning every open ballot
pub struct VoteEngine {
    store: BallotStore,
    policy: Arc<dyn PolicySource>,
    membership: Arc<dyn MembershipSource>,
    notifier: Arc<dyn NotificationSink>,
    executor: Arc<dyn ActionExecutor>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    executions: TaskTracker,
}

impl VoteEngine {
    pub fn new(
        policy: Arc<dyn PolicySource>,
        membership: Arc<dyn MembershipSource>,
        notifier: Arc<dyn NotificationSink>,
        executor: Arc<dyn ActionExecutor>,
    ) -> Self {
        Self {
            store: BallotStore::new(),
            policy,
            membership,
            notifier,
            executor,
            audit: Arc::new(NoAuditLog),
            clock: Arc::new(SystemClock),
            executions: TaskTracker::new(),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Number of registered ballots
    pub fn open_ballots(&self) -> usize {
        self.store.len()
    }

    pub fn has_open_ballot(&self, initiator: &ParticipantId) -> bool {
        self.store.has_open(initiator)
    }

    /// Wait for every approved action started so far to finish.
    pub async fn wait_for_executions(&self) {
        self.executions.close();
        self.executions.wait().await;
        self.executions.reopen();
    }

    // ==================== Initiation ====================

    /// Open a ballot over the membership source's current roster
    pub fn initiate_from_roster(
        &self,
        initiator: &Participant,
        payload: &str,
    ) -> Result<BallotHandle, InitiationError> {
        let roster = self.membership.current_roster();
        self.initiate(initiator, payload, roster)
    }

    /// Open a ballot with `roster` as its fixed set of eligible voters.
    pub fn initiate(
        &self,
        initiator: &Participant,
        payload: &str,
        roster: Vec<Participant>,
    ) -> Result<BallotHandle, InitiationError> {
        if self.store.has_open(initiator.id()) {
            return Err(InitiationError::AlreadyActive);
        }

        let policy = self.policy.current();
        let ballot = Ballot::new(
            initiator.clone(),
            payload.trim(),
            roster,
            self.clock.now(),
            policy.vote_timeout(),
        );

        let online = ballot.eligible_count();
        if online < policy.minimum_voters {
            return Err(InitiationError::TooFewOnline {
                required: policy.minimum_voters,
                online,
            });
        }

        let audit_summary = NoticeTemplate::audit_opened(&ballot);
        let recipients: Vec<ParticipantId> = ballot.eligible_ids().cloned().collect();
        let handle = BallotHandle {
            initiator: initiator.id().clone(),
            payload: ballot.action_payload().to_string(),
            eligible: online,
            timeout: ballot.timeout(),
        };

        self.store
            .try_insert(ballot)
            .map_err(|_| InitiationError::AlreadyActive)?;

        info!(
            "Ballot opened by {} for '{}' ({} eligible, {}s)",
            initiator.id(),
            handle.payload,
            handle.eligible,
            handle.timeout.as_secs()
        );

        self.notifier.broadcast(
            &recipients,
            &NoticeTemplate::initiated(initiator.display_name(), &handle.payload, &policy),
        );
        self.write_audit(AuditTag::Initiated, audit_summary);

        Ok(handle)
    }

    // ==================== Casting ====================

    /// Record `voter`'s choice on the oldest open ballot they are eligible for.
    ///
    /// A repeated cast overwrites the earlier choice. If this vote completes
    /// the ballot it is concluded before returning. A ballot found past its
    /// timeout is concluded without the vote and the next candidate is tried.
    pub async fn cast_vote(
        &self,
        voter: &ParticipantId,
        choice: VoteChoice,
    ) -> Result<CastOutcome, CastError> {
        for slot in self.store.candidates_for(voter) {
            let Some(step) = self.apply_cast(&slot, voter, choice)? else {
                continue;
            };

            match step {
                CastStep::Recorded {
                    changed,
                    tally,
                    seconds_remaining,
                } => {
                    let outcome = CastOutcome {
                        choice,
                        changed,
                        concluded: false,
                    };
                    self.notifier
                        .notify(voter, &NoticeTemplate::cast_confirmation(&outcome));
                    self.notifier.broadcast(
                        &self.membership.current_ids(),
                        &NoticeTemplate::status_update(&tally, seconds_remaining),
                    );
                    return Ok(outcome);
                }
                CastStep::Completed { changed, concluded } => {
                    let outcome = CastOutcome {
                        choice,
                        changed,
                        concluded: true,
                    };
                    self.notifier
                        .notify(voter, &NoticeTemplate::cast_confirmation(&outcome));
                    self.store.remove(&slot);
                    debug!("All eligible voters have voted on {}'s ballot", slot.initiator());
                    self.conclude(concluded);
                    return Ok(outcome);
                }
                CastStep::Expired { concluded } => {
                    self.store.remove(&slot);
                    debug!(
                        "{}'s ballot expired before {} voted",
                        slot.initiator(),
                        voter
                    );
                    self.conclude(concluded);
                }
            }
        }

        Err(CastError::NoActiveBallot)
    }

    /// Mutate the ballot in `slot`. `None` if it was concluded meanwhile.
    fn apply_cast(
        &self,
        slot: &BallotSlot,
        voter: &ParticipantId,
        choice: VoteChoice,
    ) -> Result<Option<CastStep>, CastError> {
        let mut guard = slot.lock();
        let Some(ballot) = guard.as_mut() else {
            return Ok(None);
        };

        let now = self.clock.now();
        if ballot.is_expired(now) {
            let concluded = guard.take().map(|b| b.conclude(now));
            return Ok(concluded.map(|concluded| CastStep::Expired { concluded }));
        }

        let changed = ballot.cast(voter, choice)?;
        debug!(
            "{} voted {} on {}'s ballot{}",
            voter,
            choice,
            slot.initiator(),
            if changed { " (changed)" } else { "" }
        );

        if ballot.is_complete() {
            let concluded = guard.take().map(|b| b.conclude(now));
            return Ok(concluded.map(|concluded| CastStep::Completed { changed, concluded }));
        }

        Ok(Some(CastStep::Recorded {
            changed,
            tally: ballot.tally(),
            seconds_remaining: ballot.seconds_remaining(now),
        }))
    }

    // ==================== Expiry ====================

    /// Conclude every ballot past its timeout. Returns how many concluded.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut expired = Vec::new();

        for slot in self.store.snapshot() {
            if let Some(concluded) = take_if_expired(&slot, now) {
                self.store.remove(&slot);
                expired.push(concluded);
            }
        }

        let count = expired.len();
        for concluded in expired {
            debug!(
                "Ballot by {} expired with {} abstention(s)",
                concluded.initiator().id(),
                concluded.tally().not_voted
            );
            self.conclude(concluded);
        }
        count
    }

    // ==================== Status ====================

    /// Status of every open ballot, oldest first
    pub fn status(&self) -> Vec<BallotStatus> {
        let now = self.clock.now();
        self.store
            .snapshot()
            .iter()
            .filter_map(|slot| {
                let guard = slot.lock();
                let ballot = guard.as_ref()?;
                let tally = ballot.tally();
                Some(BallotStatus {
                    initiator: ballot.initiator().display_name().to_string(),
                    payload: ballot.action_payload().to_string(),
                    yes: tally.yes,
                    no: tally.no,
                    not_voted: tally.not_voted,
                    seconds_remaining: ballot.seconds_remaining(now),
                })
            })
            .collect()
    }

    // ==================== Conclusion ====================

    /// Decide, announce and audit a concluded ballot, then start the
    /// action if it passed.
    fn conclude(&self, concluded: ConcludedBallot) -> Decision {
        let policy = self.policy.current();
        let decision = decide(&concluded, &policy);
        let initiator = concluded.initiator().clone();

        info!(
            "Ballot by {} for '{}' {} after {}s{}",
            initiator.id(),
            concluded.action_payload(),
            decision.status_tag(),
            concluded.open_for().as_secs(),
            decision
                .reason
                .as_ref()
                .map(|r| format!(": {}", r))
                .unwrap_or_default()
        );

        let recipients = self.membership.current_ids();
        self.notifier
            .broadcast(&recipients, &NoticeTemplate::result(&concluded, &decision));
        self.write_audit(
            AuditTag::from(&decision),
            NoticeTemplate::audit_concluded(&concluded, &decision),
        );

        if let Some(approval) = BallotApproval::from_decision(&concluded, &decision) {
            let context = ExecutionContext::approved(initiator, approval);
            self.spawn_execution(concluded.action_payload().to_string(), context, recipients);
        }
        decision
    }

    /// Run an approved action in the background and report how it went.
    fn spawn_execution(
        &self,
        payload: String,
        context: ExecutionContext,
        recipients: Vec<ParticipantId>,
    ) {
        let executor = self.executor.clone();
        let notifier = self.notifier.clone();

        self.executions.spawn(async move {
            let initiator = context.actor.id();
            match executor.execute(&payload, &context).await {
                Ok(0) => {
                    notifier.broadcast(&recipients, NoticeTemplate::execution_succeeded());
                }
                Ok(code) => {
                    warn!("Approved action exited with code {}", code);
                    notifier.notify(initiator, &NoticeTemplate::execution_unsuccessful(code));
                }
                Err(e) => {
                    warn!("Approved action failed: {}", e);
                    notifier.notify(initiator, &NoticeTemplate::execution_failed(&e.to_string()));
                }
            }
        });
    }

    fn write_audit(&self, tag: AuditTag, summary: String) {
        if let Err(e) = self.audit.append(&AuditRecord::new(tag, summary)) {
            warn!("Failed to write audit entry ({}): {}", tag, e);
        }
    }
}

fn take_if_expired(slot: &BallotSlot, now: Instant) -> Option<ConcludedBallot> {
    let mut guard = slot.lock();
    if guard.as_ref()?.is_expired(now) {
        guard.take().map(|b| b.conclude(now))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use crate::test_support::{
        FailingAudit, HeldExecutor, RecordingAudit, RecordingExecutor, RecordingNotifier,
        StaticRoster,
    };
    use ballot_domain::VotingPolicy;

    struct Harness {
        engine: Arc<VoteEngine>,
        notifier: Arc<RecordingNotifier>,
        executor: Arc<RecordingExecutor>,
        audit: Arc<RecordingAudit>,
        clock: Arc<ManualClock>,
    }

    fn harness(names: &[&str], policy: VotingPolicy) -> Harness {
        let notifier = Arc::new(RecordingNotifier::default());
        let executor = Arc::new(RecordingExecutor::succeeding());
        let audit = Arc::new(RecordingAudit::default());
        let clock = Arc::new(ManualClock::new());
        let engine = VoteEngine::new(
            Arc::new(policy),
            Arc::new(StaticRoster::new(names)),
            notifier.clone(),
            executor.clone(),
        )
        .with_audit(audit.clone())
        .with_clock(clock.clone());

        Harness {
            engine: Arc::new(engine),
            notifier,
            executor,
            audit,
            clock,
        }
    }

    fn p(name: &str) -> Participant {
        Participant::named(name)
    }

    fn id(name: &str) -> ParticipantId {
        ParticipantId::new(name)
    }

    #[tokio::test]
    async fn test_initiate_broadcasts_and_audits() {
        let h = harness(&["alice", "bob", "carol"], VotingPolicy::default());
        let handle = h
            .engine
            .initiate_from_roster(&p("alice"), " /weather clear ")
            .unwrap();

        assert_eq!(handle.payload, "/weather clear");
        assert_eq!(handle.eligible, 3);
        assert_eq!(handle.timeout, Duration::from_secs(30));
        assert!(h.engine.has_open_ballot(&id("alice")));

        let sent = h.notifier.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.len(), 3);
        assert!(sent[0].1.contains("VOTE INITIATED"));
        assert_eq!(h.audit.tags(), vec![AuditTag::Initiated]);
    }

    #[tokio::test]
    async fn test_second_initiation_is_rejected() {
        let h = harness(&["alice", "bob"], VotingPolicy::default());
        h.engine.initiate_from_roster(&p("alice"), "/kill @e").unwrap();

        assert_eq!(
            h.engine.initiate_from_roster(&p("alice"), "/give alice diamond"),
            Err(InitiationError::AlreadyActive)
        );
        assert_eq!(h.engine.open_ballots(), 1);
        assert_eq!(h.engine.status()[0].payload, "/kill @e");
    }

    #[tokio::test]
    async fn test_too_few_online() {
        let h = harness(&["alice"], VotingPolicy::default().with_minimum_voters(2));
        assert_eq!(
            h.engine.initiate_from_roster(&p("alice"), "/time set day"),
            Err(InitiationError::TooFewOnline {
                required: 2,
                online: 1
            })
        );
        assert_eq!(h.engine.open_ballots(), 0);
        assert!(h.notifier.messages().is_empty());
        assert!(h.audit.tags().is_empty());
    }

    #[tokio::test]
    async fn test_cast_without_ballot() {
        let h = harness(&["alice", "bob"], VotingPolicy::default());
        assert_eq!(
            h.engine.cast_vote(&id("bob"), VoteChoice::Yes).await,
            Err(CastError::NoActiveBallot)
        );
    }

    #[tokio::test]
    async fn test_first_and_changed_vote() {
        let h = harness(&["alice", "bob", "carol"], VotingPolicy::default());
        h.engine.initiate_from_roster(&p("alice"), "/weather rain").unwrap();

        let first = h.engine.cast_vote(&id("bob"), VoteChoice::Yes).await.unwrap();
        assert!(!first.changed);
        assert!(!first.concluded);

        let second = h.engine.cast_vote(&id("bob"), VoteChoice::No).await.unwrap();
        assert!(second.changed);
        assert_eq!(second.choice, VoteChoice::No);

        let status = &h.engine.status()[0];
        assert_eq!((status.yes, status.no, status.not_voted), (0, 1, 2));

        let texts = h.notifier.texts_for(&id("bob"));
        assert!(texts.iter().any(|t| t == "You voted YES"));
        assert!(texts.iter().any(|t| t == "You changed your vote to NO"));
        assert!(texts.iter().any(|t| t.starts_with("Vote status: 0 YES | 1 NO | 2 not voted")));
    }

    #[tokio::test]
    async fn test_full_participation_concludes_immediately() {
        let h = harness(&["alice", "bob", "carol"], VotingPolicy::default());
        h.engine.initiate_from_roster(&p("alice"), "/time set day").unwrap();

        h.engine.cast_vote(&id("alice"), VoteChoice::Yes).await.unwrap();
        h.engine.cast_vote(&id("bob"), VoteChoice::Yes).await.unwrap();
        let last = h.engine.cast_vote(&id("carol"), VoteChoice::No).await.unwrap();

        assert!(last.concluded);
        assert_eq!(h.engine.open_ballots(), 0);
        assert_eq!(h.audit.tags(), vec![AuditTag::Initiated, AuditTag::Passed]);

        h.engine.wait_for_executions().await;
        let runs = h.executor.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].payload, "/time set day");
        assert_eq!(runs[0].actor, id("alice"));
        assert!(runs[0].approved);

        // Nothing left for the sweep
        h.clock.advance(Duration::from_secs(60));
        assert_eq!(h.engine.sweep_expired().await, 0);
        assert_eq!(h.audit.tags().len(), 2);
    }

    #[tokio::test]
    async fn test_timeout_with_abstention_passes() {
        let h = harness(&["a", "b", "c"], VotingPolicy::default());
        h.engine.initiate_from_roster(&p("a"), "/difficulty easy").unwrap();
        h.engine.cast_vote(&id("a"), VoteChoice::Yes).await.unwrap();
        h.engine.cast_vote(&id("b"), VoteChoice::No).await.unwrap();

        h.clock.advance(Duration::from_secs(30));
        assert_eq!(h.engine.sweep_expired().await, 0, "exactly the timeout is not expired");

        h.clock.advance(Duration::from_secs(1));
        assert_eq!(h.engine.sweep_expired().await, 1);
        assert_eq!(h.engine.open_ballots(), 0);

        let summaries = h.audit.summaries();
        let last = summaries.last().unwrap();
        assert!(last.contains("Abstained (1): c"));
        assert!(last.ends_with("Result: PASSED"));
        h.engine.wait_for_executions().await;
        assert_eq!(h.executor.runs().len(), 1);
        assert!(
            h.notifier
                .texts_for(&id("a"))
                .iter()
                .any(|t| t == "Command executed successfully!")
        );
    }

    #[tokio::test]
    async fn test_timeout_with_single_vote_fails() {
        let h = harness(&["a", "b", "c"], VotingPolicy::default());
        h.engine.initiate_from_roster(&p("a"), "/op a").unwrap();
        h.engine.cast_vote(&id("a"), VoteChoice::Yes).await.unwrap();

        h.clock.advance(Duration::from_secs(31));
        assert_eq!(h.engine.sweep_expired().await, 1);

        assert_eq!(h.audit.tags(), vec![AuditTag::Initiated, AuditTag::Failed]);
        assert!(h.executor.runs().is_empty());
        assert!(
            h.notifier
                .texts_for(&id("b"))
                .iter()
                .any(|t| t.contains("Insufficient votes: 1/2 required"))
        );
    }

    #[tokio::test]
    async fn test_timeout_is_fixed_at_creation() {
        let policy = Arc::new(crate::config::SharedPolicy::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = Arc::new(ManualClock::new());
        let engine = VoteEngine::new(
            policy.clone(),
            Arc::new(StaticRoster::new(&["a", "b", "c"])),
            notifier,
            Arc::new(RecordingExecutor::succeeding()),
        )
        .with_clock(clock.clone());

        engine.initiate_from_roster(&p("a"), "/weather rain").unwrap();
        use crate::ports::policy_source::PolicyAccessorPort;
        policy.policy_set("voting.timeout_secs", "300").unwrap();

        clock.advance(Duration::from_secs(31));
        assert_eq!(engine.sweep_expired().await, 1);
    }

    #[tokio::test]
    async fn test_executor_failure_reported_to_initiator_only() {
        let notifier = Arc::new(RecordingNotifier::default());
        let audit = Arc::new(RecordingAudit::default());
        let engine = VoteEngine::new(
            Arc::new(VotingPolicy::default()),
            Arc::new(StaticRoster::new(&["a", "b"])),
            notifier.clone(),
            Arc::new(RecordingExecutor::failing("boom")),
        )
        .with_audit(audit.clone());

        engine.initiate_from_roster(&p("a"), "/summon zombie").unwrap();
        engine.cast_vote(&id("a"), VoteChoice::Yes).await.unwrap();
        engine.cast_vote(&id("b"), VoteChoice::Yes).await.unwrap();
        engine.wait_for_executions().await;

        assert!(
            notifier
                .texts_for(&id("a"))
                .iter()
                .any(|t| t.starts_with("Error executing command:"))
        );
        assert!(
            !notifier
                .texts_for(&id("b"))
                .iter()
                .any(|t| t.starts_with("Error executing command:"))
        );
        // Still recorded as passed
        assert_eq!(audit.tags(), vec![AuditTag::Initiated, AuditTag::Passed]);
    }

    #[tokio::test]
    async fn test_nonzero_exit_reported_to_initiator() {
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = VoteEngine::new(
            Arc::new(VotingPolicy::default()),
            Arc::new(StaticRoster::new(&["a", "b"])),
            notifier.clone(),
            Arc::new(RecordingExecutor::exiting(2)),
        );

        engine.initiate_from_roster(&p("a"), "/fill").unwrap();
        engine.cast_vote(&id("a"), VoteChoice::Yes).await.unwrap();
        engine.cast_vote(&id("b"), VoteChoice::Yes).await.unwrap();
        engine.wait_for_executions().await;

        assert!(
            notifier
                .texts_for(&id("a"))
                .iter()
                .any(|t| t.contains("Possible syntax issue"))
        );
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_affect_voting() {
        let engine = VoteEngine::new(
            Arc::new(VotingPolicy::default()),
            Arc::new(StaticRoster::new(&["a", "b"])),
            Arc::new(RecordingNotifier::default()),
            Arc::new(RecordingExecutor::succeeding()),
        )
        .with_audit(Arc::new(FailingAudit));

        engine.initiate_from_roster(&p("a"), "/weather clear").unwrap();
        engine.cast_vote(&id("a"), VoteChoice::Yes).await.unwrap();
        let outcome = engine.cast_vote(&id("b"), VoteChoice::Yes).await.unwrap();
        assert!(outcome.concluded);
    }

    #[tokio::test]
    async fn test_voter_in_two_ballots_votes_on_oldest() {
        let h = harness(&["a", "b", "c"], VotingPolicy::default());
        h.engine.initiate(&p("a"), "/first", vec![p("a"), p("c")]).unwrap();
        h.engine.initiate(&p("b"), "/second", vec![p("b"), p("c")]).unwrap();

        h.engine.cast_vote(&id("c"), VoteChoice::No).await.unwrap();
        let status = h.engine.status();
        assert_eq!(status[0].payload, "/first");
        assert_eq!(status[0].no, 1);
        assert_eq!(status[1].no, 0);
    }

    #[tokio::test]
    async fn test_roster_fixed_at_creation() {
        let h = harness(&["a", "b"], VotingPolicy::default());
        h.engine.initiate(&p("a"), "/weather clear", vec![p("a"), p("b")]).unwrap();

        assert_eq!(
            h.engine.cast_vote(&id("late"), VoteChoice::Yes).await,
            Err(CastError::NoActiveBallot)
        );
    }

    #[tokio::test]
    async fn test_policy_read_fresh_at_decision() {
        let policy = Arc::new(crate::config::SharedPolicy::default());
        let audit = Arc::new(RecordingAudit::default());
        let engine = VoteEngine::new(
            policy.clone(),
            Arc::new(StaticRoster::new(&["a", "b"])),
            Arc::new(RecordingNotifier::default()),
            Arc::new(RecordingExecutor::succeeding()),
        )
        .with_audit(audit.clone());

        engine.initiate_from_roster(&p("a"), "/gamemode creative").unwrap();
        use crate::ports::policy_source::PolicyAccessorPort;
        policy.policy_set("voting.approval_threshold", "0.6").unwrap();

        engine.cast_vote(&id("a"), VoteChoice::Yes).await.unwrap();
        engine.cast_vote(&id("b"), VoteChoice::No).await.unwrap();
        assert_eq!(audit.tags(), vec![AuditTag::Initiated, AuditTag::Failed]);
    }

    #[tokio::test]
    async fn test_initiated_notice_goes_to_eligible_roster() {
        let h = harness(&["a", "b"], VotingPolicy::default());
        h.engine
            .initiate(&p("a"), "/weather clear", vec![p("a"), p("remote")])
            .unwrap();

        let sent = h.notifier.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, vec![id("a"), id("remote")]);
        assert!(h.notifier.texts_for(&id("b")).is_empty());
    }

    #[tokio::test]
    async fn test_vote_after_timeout_concludes_without_counting() {
        let h = harness(&["a", "b", "c"], VotingPolicy::default());
        h.engine.initiate_from_roster(&p("a"), "/op a").unwrap();
        h.engine.cast_vote(&id("a"), VoteChoice::Yes).await.unwrap();

        // The sweep has not run yet
        h.clock.advance(Duration::from_secs(31));
        assert_eq!(
            h.engine.cast_vote(&id("b"), VoteChoice::Yes).await,
            Err(CastError::NoActiveBallot)
        );
        assert_eq!(h.engine.open_ballots(), 0);
        assert_eq!(h.engine.sweep_expired().await, 0);

        assert_eq!(h.audit.tags(), vec![AuditTag::Initiated, AuditTag::Failed]);
        assert!(h.audit.summaries()[1].contains("Abstained (2)"));
        assert!(
            !h.notifier
                .texts_for(&id("b"))
                .iter()
                .any(|t| t == "You voted YES")
        );
        h.engine.wait_for_executions().await;
        assert!(h.executor.runs().is_empty());
    }

    #[tokio::test]
    async fn test_vote_skips_expired_ballot_for_newer_one() {
        let h = harness(&["a", "b", "c"], VotingPolicy::default());
        h.engine.initiate(&p("a"), "/first", vec![p("a"), p("c")]).unwrap();
        h.clock.advance(Duration::from_secs(20));
        h.engine.initiate(&p("b"), "/second", vec![p("b"), p("c")]).unwrap();
        h.clock.advance(Duration::from_secs(15));

        let outcome = h.engine.cast_vote(&id("c"), VoteChoice::No).await.unwrap();
        assert!(!outcome.concluded);

        let status = h.engine.status();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].payload, "/second");
        assert_eq!(status[0].no, 1);
        assert_eq!(
            h.audit.tags(),
            vec![AuditTag::Initiated, AuditTag::Initiated, AuditTag::Failed]
        );
    }

    #[tokio::test]
    async fn test_slow_action_holds_up_neither_casting_nor_sweep() {
        let notifier = Arc::new(RecordingNotifier::default());
        let executor = Arc::new(HeldExecutor::new());
        let clock = Arc::new(ManualClock::new());
        let engine = VoteEngine::new(
            Arc::new(VotingPolicy::default()),
            Arc::new(StaticRoster::new(&["a", "b", "c", "d"])),
            notifier.clone(),
            executor.clone(),
        )
        .with_clock(clock.clone());

        engine.initiate(&p("a"), "/kill @e", vec![p("a"), p("b")]).unwrap();
        engine.initiate(&p("c"), "/weather rain", vec![p("c"), p("d")]).unwrap();
        engine.cast_vote(&id("a"), VoteChoice::Yes).await.unwrap();

        let last = tokio::time::timeout(
            Duration::from_secs(5),
            engine.cast_vote(&id("b"), VoteChoice::Yes),
        )
        .await
        .expect("last vote must not wait for the action")
        .unwrap();
        assert!(last.concluded);

        // c's ballot expires while /kill is still running
        clock.advance(Duration::from_secs(31));
        let swept = tokio::time::timeout(Duration::from_secs(5), engine.sweep_expired())
            .await
            .expect("sweep must not wait for the action");
        assert_eq!(swept, 1);
        assert_eq!(engine.open_ballots(), 0);
        assert!(
            !notifier
                .texts_for(&id("a"))
                .iter()
                .any(|t| t == "Command executed successfully!")
        );

        executor.release();
        engine.wait_for_executions().await;
        assert_eq!(executor.payloads(), vec!["/kill @e".to_string()]);
        assert!(
            notifier
                .texts_for(&id("a"))
                .iter()
                .any(|t| t == "Command executed successfully!")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_casts_and_sweeps_conclude_once() {
        let names: Vec<String> = (0..12).map(|i| format!("v{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let h = harness(&refs, VotingPolicy::default());

        for round in 0..20 {
            h.engine
                .initiate_from_roster(&p("v0"), &format!("/time set {}", round))
                .unwrap();
            h.clock.advance(Duration::from_secs(31));

            let mut tasks = Vec::new();
            for name in &names {
                let engine = h.engine.clone();
                let voter = id(name);
                tasks.push(tokio::spawn(async move {
                    let _ = engine.cast_vote(&voter, VoteChoice::Yes).await;
                }));
                let engine = h.engine.clone();
                tasks.push(tokio::spawn(async move {
                    engine.sweep_expired().await;
                }));
            }
            futures::future::join_all(tasks).await;
            h.engine.sweep_expired().await;
            assert_eq!(h.engine.open_ballots(), 0);
        }

        let tags = h.audit.tags();
        let initiated = tags.iter().filter(|t| **t == AuditTag::Initiated).count();
        let concluded = tags.len() - initiated;
        assert_eq!(initiated, 20);
        assert_eq!(concluded, 20, "every ballot concludes exactly once");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_are_not_lost() {
        let names: Vec<String> = (0..50).map(|i| format!("v{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let h = harness(&refs, VotingPolicy::default());
        h.engine.initiate_from_roster(&p("v0"), "/weather clear").unwrap();

        // Everyone but the last voter, concurrently
        let tasks: Vec<_> = names[..49]
            .iter()
            .map(|name| {
                let engine = h.engine.clone();
                let voter = id(name);
                tokio::spawn(async move { engine.cast_vote(&voter, VoteChoice::Yes).await })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            assert!(result.unwrap().is_ok());
        }

        let status = &h.engine.status()[0];
        assert_eq!(status.yes, 49);
        assert_eq!(status.not_voted, 1);
    }
}
