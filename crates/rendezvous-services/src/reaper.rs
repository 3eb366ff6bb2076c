//! Reaper — periodically evicts communities that stopped announcing.
//!
//! A single sequential loop: each sweep finishes before the next tick is
//! awaited, and missed ticks are skipped rather than bursted, so sweeps never
//! overlap or pile up. Each sweep runs in its own task; a panicking sweep is
//! logged and the loop carries on with the next tick.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::registry::SharedRegistry;

pub struct Reaper {
    registry: SharedRegistry,
    interval: Duration,
    shutdown: broadcast::Receiver<()>,
}

impl Reaper {
    pub fn new(
        registry: SharedRegistry,
        interval: Duration,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            registry,
            interval,
            shutdown,
        }
    }

    /// Sweep every `interval` until shutdown is signalled.
    ///
    /// The first sweep happens one full interval after start.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        interval.tick().await;

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            timeout_secs = self.registry.liveness_timeout().as_secs(),
            "reaper starting"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("reaper shutting down");
                    return Ok(());
                }

                _ = interval.tick() => {
                    let registry = self.registry.clone();
                    match tokio::spawn(async move { registry.sweep().await }).await {
                        Ok(removed) => tracing::trace!(removed, "sweep complete"),
                        Err(e) => tracing::error!(error = %e, "sweep failed"),
                    }
                }
            }
        }
    }
}
