//! Ballot lifecycle
//!
//! - [`entities`]: open and concluded ballots
//! - [`decision`]: pass/fail tallying
//! - [`notice`]: participant-facing texts

pub mod decision;
pub mod entities;
pub mod notice;

pub use decision::{Decision, FailureReason, decide};
pub use entities::{Ballot, CastOutcome, ConcludedBallot, Tally, VoteChoice};
pub use notice::{AUDIT_SEPARATOR, NoticeTemplate};
