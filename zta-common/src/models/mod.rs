// File: zta-common/src/models/mod.rs
pub mod presence;
pub mod redeem_code;
pub mod user;

pub use presence::{PresenceMarker, PresenceState};
pub use redeem_code::{ClaimOutcome, RedeemCode};
pub use user::UserAccount;
