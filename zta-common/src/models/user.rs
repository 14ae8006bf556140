// File: zta-common/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A site member: the profile record created at sign-up, keyed by the
/// identity the auth provider assigned. `role` holds the current cosmic
/// rank, overwritten (never accumulated) by each redemption.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct UserAccount {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(user_id: Uuid, username: &str, email: &str) -> Self {
        Self {
            user_id,
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            banned: false,
            role: None,
            created_at: Utc::now(),
        }
    }
}
