// src/auth/admin.rs

use std::sync::Arc;

use tracing::info;

use crate::auth::session::LocalState;
use crate::Error;

/// The admin page gate: a password compared against a configured constant,
/// setting a flag in local session state that route guards consult. This
/// reproduces the original behavioral contract only; a local flag is
/// trivially bypassable and is NOT an access-control boundary.
pub struct AdminGate {
    master_password: String,
    state: Arc<LocalState>,
}

impl AdminGate {
    pub fn new(master_password: impl Into<String>, state: Arc<LocalState>) -> Self {
        Self {
            master_password: master_password.into(),
            state,
        }
    }

    /// On a match, sets the local admin flag and returns true.
    pub fn check_password(&self, input: &str) -> bool {
        if input == self.master_password {
            self.state.set_admin(true);
            info!("admin gate unlocked for this session");
            true
        } else {
            false
        }
    }

    /// Route guard: `Error::Auth` unless the local flag is set.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.state.is_admin() {
            Ok(())
        } else {
            Err(Error::Auth("admin login required".to_string()))
        }
    }
}
