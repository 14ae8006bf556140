// File: zta-common/src/traits/auth_traits.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;

/// The hosted-auth surface consumed by the session layer. Implementations
/// own credential storage; who is currently signed in is session state and
/// lives with the caller, not here.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers a new identity and returns its id. Fails with
    /// `Error::Auth` on a duplicate email or a password the provider's
    /// policy rejects.
    async fn create_identity(&self, email: &str, password: &str) -> Result<Uuid, Error>;

    /// Checks credentials and returns the matching identity id. The error
    /// message does not distinguish an unknown email from a wrong password.
    async fn verify(&self, email: &str, password: &str) -> Result<Uuid, Error>;
}
