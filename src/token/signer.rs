// src/token/signer.rs
//! Keyed-hash signing primitive for credentials.
//!
//! The signature is an HMAC-SHA-256 over the dot-joined header and payload
//! segments, keyed with the server-held secret and encoded with the same
//! URL-safe codec as the segments it covers. Any one-bit change to either
//! segment or to the secret changes the digest completely; the avalanche
//! property is the hash primitive's, not ours.

use ring::hmac;

use super::codec::encode_bytes;

/// Computes the base64url-encoded HMAC-SHA-256 signature over
/// `"<header>.<payload>"`.
///
/// Deterministic for fixed inputs: verification recomputes this value from
/// the raw segments it received and compares, so signing and verifying are
/// the same operation performed on different ends.
///
/// # Arguments
/// * `header_segment` - Already-encoded header segment
/// * `payload_segment` - Already-encoded payload segment
/// * `secret` - Server-held signing secret
pub fn sign_segments(header_segment: &str, payload_segment: &str, secret: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let signing_input = format!("{}.{}", header_segment, payload_segment);
    let tag = hmac::sign(&key, signing_input.as_bytes());
    encode_bytes(tag.as_ref())
}
