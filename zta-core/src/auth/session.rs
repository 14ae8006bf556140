// src/auth/session.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use zta_common::models::UserAccount;
use zta_common::traits::{AuthProvider, UserRepository};

use crate::presence::PresenceRecorder;
use crate::Error;

/// The client-side storage slot: which identity this session stored at
/// sign-in, plus the admin-gate flag. Private to one session and, like
/// the browser storage it stands in for, not a security boundary.
#[derive(Default)]
pub struct LocalState {
    current_user: Mutex<Option<Uuid>>,
    admin_login: AtomicBool,
}

impl LocalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored_user(&self) -> Option<Uuid> {
        *self.current_user.lock().unwrap()
    }

    pub fn set_user(&self, user_id: Uuid) {
        *self.current_user.lock().unwrap() = Some(user_id);
    }

    pub fn is_admin(&self) -> bool {
        self.admin_login.load(Ordering::Relaxed)
    }

    pub fn set_admin(&self, value: bool) {
        self.admin_login.store(value, Ordering::Relaxed);
    }

    /// Clears both the stored identity and the admin flag.
    pub fn clear(&self) {
        *self.current_user.lock().unwrap() = None;
        self.admin_login.store(false, Ordering::Relaxed);
    }
}

/// Bridges user-entered credentials to an authenticated identity and keeps
/// the local record of who is signed in.
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    users: Arc<dyn UserRepository>,
    presence: PresenceRecorder,
    state: Arc<LocalState>,
    /// Sign-in times for identities this process has seen, keyed by id.
    pub live_sessions: DashMap<Uuid, DateTime<Utc>>,
}

impl SessionManager {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        users: Arc<dyn UserRepository>,
        presence: PresenceRecorder,
        state: Arc<LocalState>,
    ) -> Self {
        Self {
            provider,
            users,
            presence,
            state,
            live_sessions: DashMap::new(),
        }
    }

    /// Creates the auth identity, then the matching profile record.
    ///
    /// If the profile insert fails after the identity was created, the
    /// error surfaces as-is and an orphaned credential is left behind;
    /// this mirrors the two-step hosted flow and is not silently repaired.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, Error> {
        let user_id = self.provider.create_identity(email, password).await?;
        let user = UserAccount::new(user_id, username, email);
        self.users.create(&user).await?;
        info!("signed up '{}' as {}", user.username, user.user_id);
        Ok(user)
    }

    /// Authenticates, stores the identity locally, and fires the
    /// best-effort online marker.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserAccount, Error> {
        let user_id = self.provider.verify(email, password).await?;
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no profile for user {user_id}")))?;

        if user.banned {
            return Err(Error::Auth("this account is banned".to_string()));
        }

        self.state.set_user(user_id);
        self.live_sessions.insert(user_id, Utc::now());
        self.presence.mark_online(user_id);
        info!("'{}' signed in", user.username);
        Ok(user)
    }

    /// Idempotent: with no stored identity it still succeeds and clears
    /// local state. Returns the handle of the detached offline write, if
    /// one was started; callers are free to drop it.
    pub fn sign_out(&self) -> Option<tokio::task::JoinHandle<()>> {
        let handle = self.state.stored_user().map(|user_id| {
            let handle = self.presence.mark_offline(user_id);
            self.live_sessions.remove(&user_id);
            info!("{user_id} signed out");
            handle
        });
        self.state.clear();
        handle
    }

    pub fn current_user_id(&self) -> Option<Uuid> {
        self.state.stored_user()
    }

    /// The stored identity, or `Error::Auth`. Operations that need a
    /// signed-in caller (redemption, admin actions) go through here.
    pub fn require_user(&self) -> Result<Uuid, Error> {
        self.state
            .stored_user()
            .ok_or_else(|| Error::Auth("you must be signed in".to_string()))
    }

    /// Profile lookup for the stored identity, if any.
    pub async fn current_user(&self) -> Result<Option<UserAccount>, Error> {
        match self.state.stored_user() {
            Some(user_id) => self.users.get(user_id).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockAuth, MockPresenceRepo, MockUserRepo};
    use mockall::predicate::eq;
    use zta_common::models::PresenceState;

    fn recorder_expecting(state: Option<PresenceState>) -> PresenceRecorder {
        let mut repo = MockPresenceRepo::new();
        match state {
            Some(expected) => {
                repo.expect_set_status()
                    .withf(move |m| m.state == expected)
                    .returning(|_| Ok(()));
            }
            None => {
                repo.expect_set_status().times(0);
            }
        }
        PresenceRecorder::new(Arc::new(repo))
    }

    fn manager(
        provider: MockAuth,
        users: MockUserRepo,
        presence: PresenceRecorder,
    ) -> SessionManager {
        SessionManager::new(
            Arc::new(provider),
            Arc::new(users),
            presence,
            Arc::new(LocalState::new()),
        )
    }

    #[tokio::test]
    async fn sign_up_creates_identity_then_profile() {
        let id = Uuid::new_v4();
        let mut provider = MockAuth::new();
        provider
            .expect_create_identity()
            .with(eq("astro@example.com"), eq("hunter22"))
            .times(1)
            .returning(move |_, _| Ok(id));

        let mut users = MockUserRepo::new();
        users
            .expect_create()
            .withf(move |u| {
                u.user_id == id
                    && u.username == "astro"
                    && u.email == "astro@example.com"
                    && !u.banned
                    && u.role.is_none()
            })
            .times(1)
            .returning(|_| Ok(()));

        let mgr = manager(provider, users, recorder_expecting(None));
        let user = mgr.sign_up("astro", "astro@example.com", "hunter22").await.unwrap();
        assert_eq!(user.user_id, id);
        // Sign-up alone does not sign the user in.
        assert!(mgr.current_user_id().is_none());
    }

    #[tokio::test]
    async fn sign_up_surfaces_profile_write_failure() {
        let mut provider = MockAuth::new();
        provider
            .expect_create_identity()
            .returning(|_, _| Ok(Uuid::new_v4()));

        let mut users = MockUserRepo::new();
        users
            .expect_create()
            .returning(|_| Err(Error::NotFound("store unreachable".into())));

        let mgr = manager(provider, users, recorder_expecting(None));
        // The orphaned credential is left behind; the caller just sees the error.
        assert!(mgr.sign_up("astro", "astro@example.com", "hunter22").await.is_err());
    }

    #[tokio::test]
    async fn sign_in_stores_identity_and_marks_online() {
        let id = Uuid::new_v4();
        let mut provider = MockAuth::new();
        provider.expect_verify().returning(move |_, _| Ok(id));

        let mut users = MockUserRepo::new();
        users.expect_get().with(eq(id)).returning(move |_| {
            Ok(Some(UserAccount::new(id, "astro", "astro@example.com")))
        });

        let mgr = manager(provider, users, recorder_expecting(Some(PresenceState::Online)));
        let user = mgr.sign_in("astro@example.com", "hunter22").await.unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(mgr.current_user_id(), Some(id));
        assert!(mgr.live_sessions.contains_key(&id));
    }

    #[tokio::test]
    async fn sign_in_refuses_banned_accounts() {
        let id = Uuid::new_v4();
        let mut provider = MockAuth::new();
        provider.expect_verify().returning(move |_, _| Ok(id));

        let mut users = MockUserRepo::new();
        users.expect_get().returning(move |_| {
            let mut u = UserAccount::new(id, "astro", "astro@example.com");
            u.banned = true;
            Ok(Some(u))
        });

        let mgr = manager(provider, users, recorder_expecting(None));
        let err = mgr.sign_in("astro@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(mgr.current_user_id().is_none());
    }

    #[tokio::test]
    async fn sign_in_rejection_surfaces_auth_error() {
        let mut provider = MockAuth::new();
        provider
            .expect_verify()
            .returning(|_, _| Err(Error::Auth("invalid email or password".into())));

        let users = MockUserRepo::new();
        let mgr = manager(provider, users, recorder_expecting(None));
        assert!(matches!(
            mgr.sign_in("astro@example.com", "wrong").await,
            Err(Error::Auth(_))
        ));
    }

    #[tokio::test]
    async fn sign_out_marks_offline_and_clears_state() {
        let id = Uuid::new_v4();
        let mut provider = MockAuth::new();
        provider.expect_verify().returning(move |_, _| Ok(id));

        let mut users = MockUserRepo::new();
        users.expect_get().returning(move |_| {
            Ok(Some(UserAccount::new(id, "astro", "astro@example.com")))
        });

        let mut repo = MockPresenceRepo::new();
        repo.expect_set_status()
            .withf(|m| m.state == PresenceState::Online)
            .returning(|_| Ok(()));
        repo.expect_set_status()
            .withf(|m| m.state == PresenceState::Offline)
            .times(1)
            .returning(|_| Ok(()));

        let mgr = manager(provider, users, PresenceRecorder::new(Arc::new(repo)));
        mgr.sign_in("astro@example.com", "hunter22").await.unwrap();
        mgr.sign_out().expect("offline write started").await.unwrap();
        assert!(mgr.current_user_id().is_none());
        assert!(mgr.live_sessions.is_empty());
    }

    #[tokio::test]
    async fn sign_out_with_no_stored_identity_is_idempotent() {
        let provider = MockAuth::new();
        let users = MockUserRepo::new();
        // No presence write may happen.
        let mgr = manager(provider, users, recorder_expecting(None));

        assert!(mgr.sign_out().is_none());
        assert!(mgr.sign_out().is_none());
        assert!(mgr.current_user_id().is_none());
    }

    #[tokio::test]
    async fn require_user_demands_a_signed_in_caller() {
        let provider = MockAuth::new();
        let users = MockUserRepo::new();
        let mgr = manager(provider, users, recorder_expecting(None));
        assert!(matches!(mgr.require_user(), Err(Error::Auth(_))));
    }
}
