// src/token/credential.rs
//! Credential issuance and verification.
//!
//! A credential is the only state shared between the send and verify legs of
//! the protocol: `base64url(header).base64url(payload).base64url(hmac)`. This
//! module is the single trust boundary for inbound credentials: a string
//! that passes [`decode_and_verify`] was issued by this system, is untampered
//! and is still inside its validity window. It deliberately checks nothing
//! else: matching the embedded identity and code against what the user
//! submitted is the verifier service's job.

use chrono::Utc;

use crate::models::claims::{OtpClaims, TokenHeader, TOKEN_ISSUER};
use crate::models::identity;
use crate::utils::compare::constant_time_eq;

use super::codec::{decode_segment, encode_segment};
use super::error::TokenError;
use super::signer::sign_segments;

/// Builds and signs a credential for an identity/code pair.
///
/// The identity is normalized before embedding, so the round-trip guarantee
/// is `decode(issue(id)).email == normalize(id)`. Expiry is absolute:
/// `now + ttl_seconds`, in Unix seconds.
///
/// # Arguments
/// * `email` - Claimant identity (normalized internally)
/// * `otp` - The one-time code to embed
/// * `secret` - Server-held signing secret
/// * `ttl_seconds` - Validity window length
pub fn issue_credential(
    email: &str,
    otp: &str,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, TokenError> {
    issue_credential_at(email, otp, secret, ttl_seconds, Utc::now().timestamp())
}

/// Clock-injected variant of [`issue_credential`] for deterministic tests.
pub fn issue_credential_at(
    email: &str,
    otp: &str,
    secret: &str,
    ttl_seconds: i64,
    now: i64,
) -> Result<String, TokenError> {
    let header = TokenHeader::hs256();
    let claims = OtpClaims {
        email: identity::normalize(email),
        otp: otp.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        exp: now + ttl_seconds,
    };

    let header_segment = encode_segment(&header)?;
    let payload_segment = encode_segment(&claims)?;
    let signature = sign_segments(&header_segment, &payload_segment, secret);

    Ok(format!("{}.{}.{}", header_segment, payload_segment, signature))
}

/// Validates a credential's authenticity and freshness, returning its claims.
///
/// Check order is fixed and security-relevant:
/// 1. shape: exactly three dot-separated segments, else [`TokenError::Malformed`];
/// 2. signature: recomputed over the raw first two segments and compared
///    with the timing-safe primitive, else [`TokenError::BadSignature`]
///    (the payload is never decoded before its signature checks out);
/// 3. payload decode: structural failures are [`TokenError::Malformed`];
/// 4. freshness: `now > exp` is [`TokenError::Expired`]; `now == exp` still
///    passes.
pub fn decode_and_verify(token: &str, secret: &str) -> Result<OtpClaims, TokenError> {
    decode_and_verify_at(token, secret, Utc::now().timestamp())
}

/// Clock-injected variant of [`decode_and_verify`] for deterministic tests.
pub fn decode_and_verify_at(token: &str, secret: &str, now: i64) -> Result<OtpClaims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    let (header_segment, payload_segment, signature) = match parts.as_slice() {
        [header, payload, signature] => (*header, *payload, *signature),
        _ => return Err(TokenError::Malformed),
    };

    let expected = sign_segments(header_segment, payload_segment, secret);
    if !constant_time_eq(&expected, signature) {
        return Err(TokenError::BadSignature);
    }

    let claims: OtpClaims = decode_segment(payload_segment)?;

    if now > claims.exp {
        return Err(TokenError::Expired {
            expired_at: claims.exp,
            now,
        });
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "chave-de-teste-com-32-caracteres!";
    const NOW: i64 = 1_700_000_000;

    fn issue_test_credential() -> String {
        issue_credential_at("user.name@protege.com.br", "583017", SECRET, 300, NOW).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_identity_code_and_expiry() {
        let token = issue_test_credential();
        let claims = decode_and_verify_at(&token, SECRET, NOW).unwrap();
        assert_eq!(claims.email, "user.name@protege.com.br");
        assert_eq!(claims.otp, "583017");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp, NOW + 300);
    }

    #[test]
    fn test_issuance_normalizes_identity() {
        let token =
            issue_credential_at("  User.Name@PROTEGE.com.br ", "583017", SECRET, 300, NOW)
                .unwrap();
        let claims = decode_and_verify_at(&token, SECRET, NOW).unwrap();
        assert_eq!(claims.email, "user.name@protege.com.br");
    }

    #[test]
    fn test_accepts_up_to_and_including_expiry_instant() {
        let token = issue_test_credential();
        assert!(decode_and_verify_at(&token, SECRET, NOW + 299).is_ok());
        assert!(decode_and_verify_at(&token, SECRET, NOW + 300).is_ok());
    }

    #[test]
    fn test_rejects_one_second_past_expiry() {
        let token = issue_test_credential();
        let result = decode_and_verify_at(&token, SECRET, NOW + 301);
        assert!(matches!(
            result,
            Err(TokenError::Expired { expired_at, now })
                if expired_at == NOW + 300 && now == NOW + 301
        ));
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let token = issue_test_credential();
        let result = decode_and_verify_at(&token, "outra-chave-de-teste-32-chars!!!", NOW);
        assert!(matches!(result, Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_wrong_part_count_is_malformed() {
        for broken in ["", "só-um", "a.b", "a.b.c.d"] {
            let result = decode_and_verify_at(broken, SECRET, NOW);
            assert!(
                matches!(result, Err(TokenError::Malformed)),
                "part count of {:?} must be malformed",
                broken
            );
        }
    }

    /// Replaces the character at `index` with a different base64url character.
    fn flip_char(segment: &str, index: usize) -> String {
        let mut chars: Vec<char> = segment.chars().collect();
        chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_any_single_character_change_in_payload_is_bad_signature() {
        let token = issue_test_credential();
        let parts: Vec<&str> = token.split('.').collect();
        for index in 0..parts[1].len() {
            let tampered = format!("{}.{}.{}", parts[0], flip_char(parts[1], index), parts[2]);
            let result = decode_and_verify_at(&tampered, SECRET, NOW);
            assert!(
                matches!(result, Err(TokenError::BadSignature)),
                "payload byte {} change must invalidate the signature",
                index
            );
        }
    }

    #[test]
    fn test_any_single_character_change_in_header_is_bad_signature() {
        let token = issue_test_credential();
        let parts: Vec<&str> = token.split('.').collect();
        for index in 0..parts[0].len() {
            let tampered = format!("{}.{}.{}", flip_char(parts[0], index), parts[1], parts[2]);
            let result = decode_and_verify_at(&tampered, SECRET, NOW);
            assert!(
                matches!(result, Err(TokenError::BadSignature)),
                "header byte {} change must invalidate the signature",
                index
            );
        }
    }

    #[test]
    fn test_tampered_signature_is_bad_signature() {
        let token = issue_test_credential();
        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], parts[1], flip_char(parts[2], 0));
        let result = decode_and_verify_at(&tampered, SECRET, NOW);
        assert!(matches!(result, Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_expired_check_runs_after_signature_check() {
        // A tampered-but-expired credential must fail on the signature, not
        // reveal anything about its contents.
        let token = issue_credential_at("user.name@protege.com.br", "583017", SECRET, 300, NOW - 10_000).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], flip_char(parts[1], 3), parts[2]);
        let result = decode_and_verify_at(&tampered, SECRET, NOW);
        assert!(matches!(result, Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_interop_with_known_wire_format() {
        // Fixed vector produced by the protocol definition: header
        // {"alg":"HS256","typ":"JWT"}, payload fields in email/otp/iss/exp
        // order. Guards against accidental reordering or renaming.
        let token = issue_test_credential();
        let header_segment = token.split('.').next().unwrap();
        let header_json = base64::decode_config(header_segment, base64::URL_SAFE_NO_PAD).unwrap();
        assert_eq!(header_json, br#"{"alg":"HS256","typ":"JWT"}"#);
    }
}
