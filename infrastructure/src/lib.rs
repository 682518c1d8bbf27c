//! Infrastructure layer for ballot-gate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod executor;
pub mod logging;
pub mod membership;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAuditConfig, FileConfig, FileExecutorConfig, FileGatingConfig,
    FileSweepConfig, FileVotingConfig,
};
pub use executor::{DryRunExecutor, ExecutorMode, ShellExecutor, executor_from_config};
pub use logging::TextAuditLog;
pub use membership::InMemoryRoster;
