// src/services/otp_issuer.rs
//! Issuance of one-time codes and their signed credentials.
//!
//! [`OtpIssuer`] owns the issue-side policy: only corporate addresses get
//! codes, issuance is rate limited per identity, codes come from the OS
//! random source, and every code is bound into a signed credential that
//! carries all state the verifier will later need.

use log::info;
use rand::rngs::OsRng;
use rand::Rng;
use std::sync::Arc;

use crate::error::AuthError;
use crate::models::identity;
use crate::services::mailer::OtpMailer;
use crate::services::rate_limit::{RateLimitDecision, RateLimiter};
use crate::token;

/// Credential lifetime in seconds.
pub const OTP_TTL_SECONDS: i64 = 300;

/// Result of a successful issuance.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    /// Signed credential binding identity, code and expiry.
    pub token: String,

    /// The raw 6-digit code. Only surfaced to callers when demo exposure is
    /// on; it always travels to the user through the mailer.
    pub code: String,
}

/// Service that issues one-time codes for corporate identities.
pub struct OtpIssuer {
    secret: String,
    rate_limiter: Arc<RateLimiter>,
    mailer: Arc<dyn OtpMailer>,
    expose_demo_code: bool,
}

impl OtpIssuer {
    /// Creates a new OtpIssuer.
    ///
    /// # Arguments
    /// * `secret` - HMAC secret used to sign issued credentials
    /// * `rate_limiter` - Shared per-identity issuance brake
    /// * `mailer` - Delivery channel for the raw codes
    /// * `expose_demo_code` - Whether to write the demo audit line with the
    ///   raw code (off in any real deployment)
    pub fn new(
        secret: String,
        rate_limiter: Arc<RateLimiter>,
        mailer: Arc<dyn OtpMailer>,
        expose_demo_code: bool,
    ) -> Self {
        OtpIssuer {
            secret,
            rate_limiter,
            mailer,
            expose_demo_code,
        }
    }

    /// Issues a fresh code for `raw_email`.
    ///
    /// The address is normalized before any policy check, so casing and
    /// surrounding whitespace never affect the outcome.
    ///
    /// # Arguments
    /// * `raw_email` - E-mail address as typed by the user
    ///
    /// # Returns
    /// The signed credential and the raw code, or the policy error that
    /// stopped issuance.
    pub fn request_code(&self, raw_email: &str) -> Result<IssuedOtp, AuthError> {
        let email = identity::normalize(raw_email);

        if !identity::is_corporate_email(&email) {
            return Err(AuthError::DomainRejected);
        }

        if let RateLimitDecision::Limited {
            retry_after_minutes,
        } = self.rate_limiter.check_and_increment(&email)
        {
            return Err(AuthError::RateLimited {
                retry_after_minutes,
            });
        }

        // 100000..=999999 keeps the leading digit nonzero, so the code is
        // always exactly six digits.
        let code = OsRng.gen_range(100_000..=999_999).to_string();

        let token = token::issue_credential(&email, &code, &self.secret, OTP_TTL_SECONDS)
            .map_err(|e| AuthError::Internal(e.into()))?;

        self.mailer
            .deliver(&email, &identity::display_name(&email), &code)
            .map_err(AuthError::Internal)?;

        info!("[2FA] OTP issued for {}", identity::mask(&email));
        if self.expose_demo_code {
            info!("[2FA DEMO] EMAIL: {} | OTP: {}", email, code);
        }

        Ok(IssuedOtp { token, code })
    }
}
