// src/test_utils/mod.rs
//
// mockall doubles for the repository and auth seams, shared by the
// service-level unit tests.

use async_trait::async_trait;
use chrono::Duration;
use mockall::mock;
use uuid::Uuid;

use zta_common::models::{ClaimOutcome, PresenceMarker, RedeemCode, UserAccount};
use zta_common::traits::{
    AuthProvider, PresenceRepository, RedeemCodeRepository, UserRepository,
};
use zta_common::Error;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn create(&self, user: &UserAccount) -> Result<(), Error>;
        async fn get(&self, user_id: Uuid) -> Result<Option<UserAccount>, Error>;
        async fn get_by_email(&self, email: &str) -> Result<Option<UserAccount>, Error>;
        async fn update(&self, user: &UserAccount) -> Result<(), Error>;
        async fn grant_role(&self, user_id: Uuid, role: &str) -> Result<(), Error>;
        async fn set_banned(&self, user_id: Uuid, banned: bool) -> Result<(), Error>;
        async fn list_all(&self) -> Result<Vec<UserAccount>, Error>;
    }
}

mock! {
    pub CodeRepo {}

    #[async_trait]
    impl RedeemCodeRepository for CodeRepo {
        async fn create(&self, code: &RedeemCode) -> Result<(), Error>;
        async fn get(&self, code: &str) -> Result<Option<RedeemCode>, Error>;
        async fn claim(&self, code: &str, user_id: Uuid) -> Result<ClaimOutcome, Error>;
        async fn list_all(&self) -> Result<Vec<RedeemCode>, Error>;
        async fn delete(&self, code: &str) -> Result<(), Error>;
    }
}

mock! {
    pub PresenceRepo {}

    #[async_trait]
    impl PresenceRepository for PresenceRepo {
        async fn set_status(&self, marker: &PresenceMarker) -> Result<(), Error>;
        async fn get_status(&self, user_id: Uuid) -> Result<Option<PresenceMarker>, Error>;
        async fn sweep_stale(&self, ttl: Duration) -> Result<u64, Error>;
    }
}

mock! {
    pub Auth {}

    #[async_trait]
    impl AuthProvider for Auth {
        async fn create_identity(&self, email: &str, password: &str) -> Result<Uuid, Error>;
        async fn verify(&self, email: &str, password: &str) -> Result<Uuid, Error>;
    }
}
