//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for ballot-gate
#[derive(Parser, Debug)]
#[command(name = "ballot-gate")]
#[command(author, version, about = "Vote-gated command execution for shared servers")]
#[command(long_about = r#"
Ballot Gate lets a group of online participants vote on privileged commands
before they run.

Gated commands open a ballot. Every participant online at that moment may
vote /yes or /no. The ballot concludes when everyone has voted or when it
times out; a passed ballot runs the command on behalf of its initiator.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./ballot.toml       Project-level config
3. ~/.config/ballot-gate/config.toml   Global config

Example:
  ballot-gate
  ballot-gate --config ./server.toml -v
  ballot-gate --dry-run --log-dir ./logs
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Override the expiry sweep interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Never run commands, only log them (overrides [executor] mode)
    #[arg(long)]
    pub dry_run: bool,
}
