// src/services/verifier.rs
//! Verification of submitted codes against their signed credentials.
//!
//! [`OtpVerifier`] is stateless: everything it needs arrives in the request
//! itself (identity, code, credential), so any instance holding the secret
//! can verify a credential issued by any other instance. Checks run from
//! cheapest to most specific, and both the identity and code comparisons go
//! through the timing-safe comparator.

use log::{info, warn};

use crate::error::AuthError;
use crate::models::identity;
use crate::token::{self, TokenError};
use crate::utils::compare::constant_time_eq;

/// Expected code length after normalization.
const CODE_LENGTH: usize = 6;

/// Service that checks a submitted code against its credential.
pub struct OtpVerifier {
    secret: String,
}

impl OtpVerifier {
    /// Creates a new OtpVerifier.
    ///
    /// # Arguments
    /// * `secret` - HMAC secret the credentials were signed with
    pub fn new(secret: String) -> Self {
        OtpVerifier { secret }
    }

    /// Verifies that `code` is the code issued to `email` inside `token`.
    ///
    /// # Arguments
    /// * `email` - E-mail address as typed by the user
    /// * `code` - Code as typed by the user (spaces and separators allowed)
    /// * `token` - Credential returned by the issue step
    ///
    /// # Returns
    /// `Ok(())` when the second factor is satisfied, otherwise the first
    /// policy error encountered in check order.
    pub fn verify(&self, email: &str, code: &str, token: &str) -> Result<(), AuthError> {
        self.verify_at(email, code, token, chrono::Utc::now().timestamp())
    }

    /// Clock-injected variant of [`verify`](Self::verify).
    pub fn verify_at(
        &self,
        email: &str,
        code: &str,
        token: &str,
        now: i64,
    ) -> Result<(), AuthError> {
        if email.trim().is_empty() || code.trim().is_empty() || token.trim().is_empty() {
            return Err(AuthError::MissingFields);
        }

        let email = identity::normalize(email);
        // Users paste codes with spaces or dashes; keep the digits only.
        let code: String = code.chars().filter(|c| c.is_ascii_digit()).collect();
        let token = token.trim();

        if code.len() != CODE_LENGTH {
            return Err(AuthError::InvalidCodeFormat);
        }

        let claims = token::decode_and_verify_at(token, &self.secret, now).map_err(|e| match e {
            TokenError::Malformed | TokenError::BadSignature => AuthError::InvalidToken,
            TokenError::Expired { .. } => AuthError::CodeExpired,
            TokenError::Encoding(source) => AuthError::Internal(source.into()),
        })?;

        if !constant_time_eq(&claims.email, &email) {
            warn!("[AUTH FAIL] {} (identity mismatch)", identity::mask(&email));
            return Err(AuthError::IdentityMismatch);
        }

        if !constant_time_eq(&claims.otp, &code) {
            warn!("[AUTH FAIL] {} (wrong code)", identity::mask(&email));
            return Err(AuthError::IncorrectCode);
        }

        info!("[AUTH OK] {}", identity::mask(&email));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::credential::issue_credential_at;

    const SECRET: &str = "chave-de-teste-com-32-caracteres!";
    const NOW: i64 = 1_700_000_000;
    const EMAIL: &str = "maria.souza@protege.com.br";
    const CODE: &str = "583017";

    fn verifier() -> OtpVerifier {
        OtpVerifier::new(SECRET.to_string())
    }

    fn fresh_token() -> String {
        issue_credential_at(EMAIL, CODE, SECRET, 300, NOW).unwrap()
    }

    #[test]
    fn test_accepts_matching_code_and_identity() {
        let token = fresh_token();
        let result = verifier().verify_at(EMAIL, CODE, &token, NOW + 60);
        assert!(result.is_ok());
    }

    #[test]
    fn test_accepts_unnormalized_email_input() {
        let token = fresh_token();
        let result = verifier().verify_at("  MARIA.SOUZA@Protege.com.br ", CODE, &token, NOW + 60);
        assert!(result.is_ok());
    }

    #[test]
    fn test_accepts_code_typed_with_separators() {
        let token = fresh_token();
        assert!(verifier()
            .verify_at(EMAIL, "583 017", &token, NOW + 60)
            .is_ok());
        assert!(verifier()
            .verify_at(EMAIL, "583-017", &token, NOW + 60)
            .is_ok());
    }

    #[test]
    fn test_accepts_token_with_surrounding_whitespace() {
        let token = format!("  {}\n", fresh_token());
        let result = verifier().verify_at(EMAIL, CODE, &token, NOW + 60);
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_fields_are_rejected_before_anything_else() {
        let token = fresh_token();

        assert!(matches!(
            verifier().verify_at("", CODE, &token, NOW),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            verifier().verify_at(EMAIL, "   ", &token, NOW),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            verifier().verify_at(EMAIL, CODE, "", NOW),
            Err(AuthError::MissingFields)
        ));
    }

    #[test]
    fn test_rejects_codes_that_are_not_six_digits() {
        let token = fresh_token();

        assert!(matches!(
            verifier().verify_at(EMAIL, "58301", &token, NOW),
            Err(AuthError::InvalidCodeFormat)
        ));
        assert!(matches!(
            verifier().verify_at(EMAIL, "5830171", &token, NOW),
            Err(AuthError::InvalidCodeFormat)
        ));
        // Letters are stripped, leaving too few digits.
        assert!(matches!(
            verifier().verify_at(EMAIL, "abc583", &token, NOW),
            Err(AuthError::InvalidCodeFormat)
        ));
    }

    #[test]
    fn test_rejects_garbage_token() {
        let result = verifier().verify_at(EMAIL, CODE, "not-a-credential", NOW);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_rejects_tampered_token() {
        let token = fresh_token();
        let last = if token.ends_with('A') { 'B' } else { 'A' };
        let mut tampered = token[..token.len() - 1].to_string();
        tampered.push(last);

        let result = verifier().verify_at(EMAIL, CODE, &tampered, NOW + 60);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_rejects_token_signed_with_another_secret() {
        let token =
            issue_credential_at(EMAIL, CODE, "outra-chave-de-32-caracteres-aqui", 300, NOW)
                .unwrap();

        let result = verifier().verify_at(EMAIL, CODE, &token, NOW + 60);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_rejects_expired_credential() {
        let token = fresh_token();
        let result = verifier().verify_at(EMAIL, CODE, &token, NOW + 301);
        assert!(matches!(result, Err(AuthError::CodeExpired)));
    }

    #[test]
    fn test_accepts_credential_at_exact_expiry_instant() {
        let token = fresh_token();
        let result = verifier().verify_at(EMAIL, CODE, &token, NOW + 300);
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_identity_other_than_the_one_issued_to() {
        let token = fresh_token();
        let result = verifier().verify_at("joao.silva@protege.com.br", CODE, &token, NOW + 60);
        assert!(matches!(result, Err(AuthError::IdentityMismatch)));
    }

    #[test]
    fn test_rejects_wrong_code_for_the_right_identity() {
        let token = fresh_token();
        let result = verifier().verify_at(EMAIL, "000000", &token, NOW + 60);
        assert!(matches!(result, Err(AuthError::IncorrectCode)));
    }

    #[test]
    fn test_expiry_is_checked_before_code_comparison() {
        // Expired credential plus wrong code must report expiry, not a code
        // mismatch.
        let token = fresh_token();
        let result = verifier().verify_at(EMAIL, "000000", &token, NOW + 301);
        assert!(matches!(result, Err(AuthError::CodeExpired)));
    }
}
