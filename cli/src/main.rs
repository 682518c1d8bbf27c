//! CLI entrypoint for Ballot Gate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use ballot_application::{
    ActionExecutor, AuditSink, GatedExecutor, NoAuditLog, NotificationSink, SharedPolicy,
    SubmitCommandUseCase, VoteEngine, spawn_expiry_sweeper,
};
use ballot_infrastructure::{
    ConfigLoader, DryRunExecutor, FileAuditConfig, InMemoryRoster, TextAuditLog,
    executor_from_config,
};
use ballot_presentation::{Cli, ConsoleNotifier, HostConsole};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting Ballot Gate");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    for issue in config.validate() {
        warn!("Config {}", issue);
    }

    let (policy, _) = config.voting.to_policy();
    let (gate, _) = config.gating.to_gate();
    info!(
        "Policy: {}s timeout, {} voters, {} votes, {}% approval; {} gated command(s)",
        policy.vote_timeout_secs,
        policy.minimum_voters,
        policy.minimum_votes_required,
        policy.threshold_percent(),
        gate.len()
    );

    // === Dependency Injection ===
    let policy = Arc::new(SharedPolicy::new(policy));
    let roster = Arc::new(InMemoryRoster::new());
    let notifier: Arc<dyn NotificationSink> = Arc::new(ConsoleNotifier::new());

    let executor: Arc<dyn ActionExecutor> = if cli.dry_run {
        info!("Executor: dry-run (forced by --dry-run)");
        Arc::new(DryRunExecutor::new())
    } else {
        let (executor, _) = executor_from_config(&config.executor);
        info!("Executor: {}", config.executor.parse_mode().0);
        executor
    };
    let gated = Arc::new(GatedExecutor::new(executor, Arc::new(gate), roster.clone()));

    let engine = Arc::new(
        VoteEngine::new(policy.clone(), roster.clone(), notifier.clone(), gated.clone())
            .with_audit(open_audit(&config.audit)),
    );
    let submit = SubmitCommandUseCase::new(engine.clone(), gated);

    // === Expiry sweep ===
    let tick = cli
        .tick_ms
        .map(|ms| Duration::from_millis(ms.max(10)))
        .unwrap_or_else(|| config.sweep.tick());
    let cancel = CancellationToken::new();
    let sweeper = spawn_expiry_sweeper(engine.clone(), tick, cancel.clone());

    // === Host console ===
    let console = HostConsole::new(engine.clone(), submit, roster, policy, notifier);
    let result = console.run().await;

    cancel.cancel();
    if let Err(e) = sweeper.await {
        warn!("Expiry sweeper ended abnormally: {}", e);
    }
    engine.wait_for_executions().await;

    result.context("Host console failed")?;
    info!("Ballot Gate stopped");
    Ok(())
}

/// Initialize logging based on verbosity level, optionally mirrored to a
/// daily-rolling file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "ballot-gate.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

/// Open the audit log, falling back to no auditing if it cannot be opened.
fn open_audit(config: &FileAuditConfig) -> Arc<dyn AuditSink> {
    if !config.enabled {
        info!("Audit log disabled");
        return Arc::new(NoAuditLog);
    }

    match TextAuditLog::open(&config.path) {
        Ok(log) => {
            info!("Audit log: {}", log.path().display());
            Arc::new(log)
        }
        Err(e) => {
            warn!(
                "Cannot open audit log {}: {}; continuing without audit",
                config.path.display(),
                e
            );
            Arc::new(NoAuditLog)
        }
    }
}
