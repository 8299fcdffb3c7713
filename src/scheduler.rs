//! Periodic refresh sweeps
//!
//! Runs `refresh_all` once at start and then on a fixed interval until shut
//! down. A slow sweep delays the next tick instead of stacking sweeps.

use crate::refresh::RefreshOrchestrator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Handle to a running refresh loop
#[derive(Debug)]
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    /// Spawn the refresh loop on the current runtime
    pub fn spawn(orchestrator: Arc<RefreshOrchestrator>, interval: Duration) -> Self {
        let (shutdown, mut signal) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!("Refresh scheduler started (every {:?})", interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!("Starting refresh sweep");
                        orchestrator.refresh_all().await;
                    }
                    changed = signal.changed() => {
                        if changed.is_err() || *signal.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Refresh scheduler stopped");
        });

        Self { shutdown, handle }
    }

    /// Stop the loop and wait for an in-flight sweep to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!("Refresh scheduler task failed: {}", e);
        }
    }

    /// Whether the loop has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
