// src/repositories/postgres/mod.rs

pub mod presence;
pub mod redeem_code;
pub mod user;

pub use presence::PostgresPresenceRepository;
pub use redeem_code::PostgresRedeemCodeRepository;
pub use user::PostgresUserRepository;
