// src/tasks/mod.rs

pub mod presence_sweep;
pub mod starfield;
