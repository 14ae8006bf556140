// File: zta-common/src/traits/repository_traits.rs

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::error::Error;
use crate::models::presence::PresenceMarker;
use crate::models::redeem_code::{ClaimOutcome, RedeemCode};
use crate::models::user::UserAccount;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &UserAccount) -> Result<(), Error>;
    async fn get(&self, user_id: Uuid) -> Result<Option<UserAccount>, Error>;
    async fn get_by_email(&self, email: &str) -> Result<Option<UserAccount>, Error>;
    async fn update(&self, user: &UserAccount) -> Result<(), Error>;
    /// Field-level merge: only the role column is written.
    async fn grant_role(&self, user_id: Uuid, role: &str) -> Result<(), Error>;
    async fn set_banned(&self, user_id: Uuid, banned: bool) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<UserAccount>, Error>;
}

#[async_trait]
pub trait RedeemCodeRepository: Send + Sync {
    async fn create(&self, code: &RedeemCode) -> Result<(), Error>;
    async fn get(&self, code: &str) -> Result<Option<RedeemCode>, Error>;

    /// Atomically consume `code` for `user_id`: flip `used` only if it is
    /// still false and merge the encoded role onto the claimant's profile,
    /// committing both writes or neither. Two concurrent claims of one
    /// code must never both return `Claimed`.
    async fn claim(&self, code: &str, user_id: Uuid) -> Result<ClaimOutcome, Error>;

    async fn list_all(&self) -> Result<Vec<RedeemCode>, Error>;
    async fn delete(&self, code: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Upsert; at most one current state per identity.
    async fn set_status(&self, marker: &PresenceMarker) -> Result<(), Error>;
    async fn get_status(&self, user_id: Uuid) -> Result<Option<PresenceMarker>, Error>;

    /// Flip `online` rows not refreshed within `ttl` to `offline`,
    /// returning how many were flipped. Covers clients that vanished
    /// without a graceful sign-out.
    async fn sweep_stale(&self, ttl: Duration) -> Result<u64, Error>;
}
