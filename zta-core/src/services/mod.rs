// src/services/mod.rs

pub mod redemption;

pub use redemption::RedemptionService;
