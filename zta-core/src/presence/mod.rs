// src/presence/mod.rs
//
// Best-effort presence markers. Writes happen on detached tasks and
// failures are logged and swallowed: a presence hiccup must never affect
// an auth or redemption outcome.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

use zta_common::models::PresenceMarker;
use zta_common::traits::PresenceRepository;

#[derive(Clone)]
pub struct PresenceRecorder {
    repo: Arc<dyn PresenceRepository>,
}

impl PresenceRecorder {
    pub fn new(repo: Arc<dyn PresenceRepository>) -> Self {
        Self { repo }
    }

    /// Fire-and-forget "online" marker. Stale markers left by ungraceful
    /// disconnects are expired by the sweep task.
    pub fn mark_online(&self, user_id: Uuid) -> JoinHandle<()> {
        self.write(PresenceMarker::online(user_id))
    }

    /// Fire-and-forget "offline" marker for graceful sign-out.
    pub fn mark_offline(&self, user_id: Uuid) -> JoinHandle<()> {
        self.write(PresenceMarker::offline(user_id))
    }

    fn write(&self, marker: PresenceMarker) -> JoinHandle<()> {
        let repo = self.repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.set_status(&marker).await {
                warn!(
                    "presence write ({}) for {} failed: {e}",
                    marker.state.as_str(),
                    marker.user_id
                );
            }
        })
    }
}
