// src/auth/mod.rs

pub mod admin;
pub mod provider;
pub mod session;

pub use admin::AdminGate;
pub use provider::PostgresAuthProvider;
pub use session::{LocalState, SessionManager};
