//! Configuration file loading for ballot-gate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./ballot.toml` or `./.ballot.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/ballot-gate/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAuditConfig, FileConfig, FileExecutorConfig, FileGatingConfig, FileSweepConfig,
    FileVotingConfig,
};
pub use loader::ConfigLoader;
