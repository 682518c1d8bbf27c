//! Periodic expiry sweep
//!
//! Ticks at a fixed interval and concludes every ballot past its timeout.

use super::vote_engine::VoteEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Spawn the sweeper on the current runtime.
///
/// The task stops when `cancel` is triggered.
pub fn spawn_expiry_sweeper(
    engine: Arc<VoteEngine>,
    tick: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!("Expiry sweeper started ({}ms tick)", tick.as_millis());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let concluded = engine.sweep_expired().await;
                    if concluded > 0 {
                        info!("Sweep concluded {} expired ballot(s)", concluded);
                    }
                }
            }
        }

        debug!("Expiry sweeper stopped");
    })
}
