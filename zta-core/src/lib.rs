// src/lib.rs

pub mod auth;
pub mod db;
pub mod presence;
pub mod repositories;
pub mod services;
pub mod tasks;
pub mod test_utils;

pub use db::Database;
pub use zta_common::error::Error;
