// src/models/claims.rs
//! OTP credential claims data model.
//!
//! Defines the two structures that make up a signed OTP credential: the
//! header naming the signing algorithm and the payload carrying the claimant
//! identity, the one-time code and the expiry instant. Field names and order
//! follow the wire format, so encoding a struct yields exactly the JSON the
//! verifier on the other side expects.

use serde::{Deserialize, Serialize};

/// Fixed issuer tag embedded in every credential this service mints.
pub const TOKEN_ISSUER: &str = "protege-2fa";

/// Credential header describing the signing algorithm.
///
/// A single algorithm is supported; the header exists so the credential is
/// self-describing on the wire, not to negotiate anything. Verification
/// recomputes the signature over the raw encoded segments and never branches
/// on the header contents.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenHeader {
    /// Signing algorithm identifier. Always `"HS256"`.
    pub alg: String,

    /// Token type tag. Always `"JWT"`.
    pub typ: String,
}

impl TokenHeader {
    /// Returns the only header this service produces: HMAC-SHA-256.
    pub fn hs256() -> Self {
        TokenHeader {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Signed payload of an OTP credential.
///
/// The credential is self-contained: validating it requires nothing beyond
/// the server secret and wall-clock time. Once `exp` has passed the
/// credential is dead; it is never mutated after issuance.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OtpClaims {
    /// Normalized (trimmed, lower-cased) claimant e-mail address.
    pub email: String,

    /// The one-time passcode, exactly 6 decimal digits.
    pub otp: String,

    /// Originating system tag, always [`TOKEN_ISSUER`].
    pub iss: String,

    /// Absolute expiry instant, Unix timestamp in seconds.
    pub exp: i64,
}
