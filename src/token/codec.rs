// src/token/codec.rs
//! URL-safe segment codec for credentials.
//!
//! Each credential segment is a structure serialized to JSON and encoded
//! with the URL-safe base64 alphabet (`+` → `-`, `/` → `_`) without padding,
//! so credentials survive query strings, form posts and copy-paste intact.
//! Encoding is pure and deterministic: the same structure always yields the
//! same segment, which is what makes signature recomputation possible.

use serde::{de::DeserializeOwned, Serialize};

use super::error::TokenError;

/// Serializes a structure and encodes it as an unpadded base64url segment.
///
/// # Arguments
/// * `value` - The structure to encode (must implement `Serialize`)
///
/// # Returns
/// - `Ok(String)` with the encoded segment
/// - `Err(TokenError::Encoding)` if JSON serialization fails
pub fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value)?;
    Ok(encode_bytes(&json))
}

/// Decodes an unpadded base64url segment back into a structure.
///
/// Any failure (stray characters, or JSON that does not fit the target
/// structure) collapses into [`TokenError::Malformed`]; callers never learn
/// which byte was wrong.
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = base64::decode_config(segment, base64::URL_SAFE_NO_PAD)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

/// Encodes raw bytes as an unpadded base64url string.
///
/// Shared by the segment encoder above and the signer, which encodes an
/// HMAC digest rather than JSON.
pub fn encode_bytes(bytes: &[u8]) -> String {
    base64::encode_config(bytes, base64::URL_SAFE_NO_PAD)
}
