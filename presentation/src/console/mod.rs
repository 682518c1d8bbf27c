//! Host console: command parsing and the interactive loop

pub mod command;
pub mod host;

pub use command::{CommandParseError, ConsoleCommand};
pub use host::{Flow, HostConsole};
