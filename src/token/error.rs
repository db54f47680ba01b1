// src/token/error.rs
//! Error types for credential encoding and verification.

use thiserror::Error;

/// Failures produced by the credential codec and signer.
///
/// These are internal, developer-facing errors; the verifier service maps
/// them onto the user-facing taxonomy (`Malformed`/`BadSignature` both become
/// an invalid-token response, `Expired` becomes an expired-code response).
#[derive(Debug, Error)]
pub enum TokenError {
    /// The credential does not have the `header.payload.signature` shape,
    /// or a segment is not decodable base64url/JSON.
    #[error("malformed credential")]
    Malformed,

    /// The recomputed signature does not match the one presented.
    #[error("credential signature mismatch")]
    BadSignature,

    /// The credential's validity window has passed.
    #[error("credential expired at {expired_at}, current time is {now}")]
    Expired {
        /// Expiry instant embedded in the credential (Unix seconds).
        expired_at: i64,
        /// Clock reading at verification time (Unix seconds).
        now: i64,
    },

    /// Claims could not be serialized while issuing a credential.
    #[error("claims encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
