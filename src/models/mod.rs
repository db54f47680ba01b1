// src/models/mod.rs
//! Data structures shared across the service: credential claims and the
//! claimant identity helpers.

pub mod claims;
pub mod identity;
