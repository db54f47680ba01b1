// src/utils/mod.rs
//! Helper primitives with no dependencies on the rest of the service.

pub mod compare;
