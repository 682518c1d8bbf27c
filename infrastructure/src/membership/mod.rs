//! Membership adapters

mod roster;

pub use roster::InMemoryRoster;
