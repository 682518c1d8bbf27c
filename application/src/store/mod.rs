//! In-process registry of open ballots

pub mod ballot_store;

pub use ballot_store::{BallotSlot, BallotStore};
