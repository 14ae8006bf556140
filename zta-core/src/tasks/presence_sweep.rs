// zta-core/src/tasks/presence_sweep.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use zta_common::traits::PresenceRepository;

/// Spawns a background task that periodically flips stale `online`
/// markers to `offline`, the stand-in for the realtime store's
/// disconnect hook, covering crashed or vanished clients. Failures are
/// logged and ignored; presence is best-effort.
pub fn spawn_presence_sweep_task(
    repo: Arc<dyn PresenceRepository>,
    interval: Duration,
    ttl: chrono::Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sleep(interval) => {
                    match repo.sweep_stale(ttl).await {
                        Ok(0) => {}
                        Ok(n) => info!("marked {n} stale session(s) offline"),
                        Err(e) => warn!("presence sweep failed: {e}"),
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    })
}
