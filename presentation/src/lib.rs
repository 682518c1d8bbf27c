//! Presentation layer for ballot-gate
//!
//! This crate contains CLI definitions, output formatters, the terminal
//! notification sink, and the interactive host console.

pub mod cli;
pub mod console;
pub mod output;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use console::{ConsoleCommand, HostConsole};
pub use output::console::ConsoleFormatter;
pub use output::formatter::NoticeFormatter;
pub use output::notifier::ConsoleNotifier;
