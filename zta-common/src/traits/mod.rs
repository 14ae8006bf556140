// File: zta-common/src/traits/mod.rs
pub mod auth_traits;
pub mod repository_traits;

pub use auth_traits::AuthProvider;
pub use repository_traits::{PresenceRepository, RedeemCodeRepository, UserRepository};
