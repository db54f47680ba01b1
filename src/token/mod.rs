// src/token/mod.rs
//! Tamper-evident bearer credentials.
//!
//! Everything the send and verify legs of the protocol share travels inside
//! a signed, time-boxed credential; no server-side session links the two
//! calls. The module is layered leaves-first: the URL-safe segment codec,
//! the HMAC signing primitive over encoded segments, and the credential
//! functions that compose them.

pub mod codec;
pub mod credential;
pub mod error;
pub mod signer;

pub use credential::{
    decode_and_verify, decode_and_verify_at, issue_credential, issue_credential_at,
};
pub use error::TokenError;
