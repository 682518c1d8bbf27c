//! Output formatting and notice delivery

pub mod console;
pub mod formatter;
pub mod notifier;
