// File: zta-common/src/models/presence.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceState {
    Online,
    Offline,
}

impl PresenceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceState::Online => "online",
            PresenceState::Offline => "offline",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "online" => Some(PresenceState::Online),
            "offline" => Some(PresenceState::Offline),
            _ => None,
        }
    }
}

/// Best-effort connectivity marker, one per identity, last write wins.
/// Ephemeral: a sweep task expires stale `online` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceMarker {
    pub user_id: Uuid,
    pub state: PresenceState,
    pub updated_at: DateTime<Utc>,
}

impl PresenceMarker {
    pub fn online(user_id: Uuid) -> Self {
        Self {
            user_id,
            state: PresenceState::Online,
            updated_at: Utc::now(),
        }
    }

    pub fn offline(user_id: Uuid) -> Self {
        Self {
            user_id,
            state: PresenceState::Offline,
            updated_at: Utc::now(),
        }
    }
}
