// src/services/mod.rs
//! Business logic and the HTTP interface: code issuance, verification,
//! rate limiting, delivery, and the Axum server tying them together.

pub mod api_server;
pub mod mailer;
pub mod otp_issuer;
pub mod rate_limit;
pub mod verifier;
