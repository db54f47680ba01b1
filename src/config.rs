// src/config.rs
//! Runtime configuration.
//!
//! Everything configurable comes from environment variables (loaded from a
//! `.env` file in development). Protocol constants such as the 300-second
//! credential TTL and the 15-minute rate-limit window are fixed and not
//! configurable.
//!
//! ## Environment Variables
//! - `OTP_JWT_SECRET`: signing/verification secret (at least 32 characters in
//!   any real deployment; a known insecure default keeps local development
//!   working out of the box).
//! - `OTP_DEMO_EXPOSE_CODE`: set to `1` or `true` to return the raw code in
//!   the send-otp response and log it. Off by default; never enable this in
//!   production.
//! - `BIND_ADDR`: socket address to listen on (default `127.0.0.1:3000`).

use log::warn;

/// Insecure fallback secret for local development. Anything signed with it
/// is forgeable by anyone who has read this file, so it must never reach
/// production.
pub const INSECURE_DEV_SECRET: &str = "protege-otp-secret-inseguro-dev";

/// Minimum secret length for a real deployment.
pub const MIN_SECRET_LEN: usize = 32;

/// Default listen address when `BIND_ADDR` is not set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration snapshot taken once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used both to sign and to verify credentials.
    pub token_secret: String,

    /// Whether the raw OTP may appear in the send-otp response and in the
    /// demo audit log line. Defaults to off.
    pub expose_demo_code: bool,

    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
}

impl AuthConfig {
    /// Reads the configuration from the environment.
    ///
    /// Never fails: missing variables fall back to development defaults,
    /// with loud warnings for the ones that are unsafe outside local use.
    pub fn from_env() -> Self {
        let token_secret = match std::env::var("OTP_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!(
                    "OTP_JWT_SECRET not set; using the insecure development secret. \
                     Do not deploy this configuration."
                );
                INSECURE_DEV_SECRET.to_string()
            }
        };

        if token_secret.len() < MIN_SECRET_LEN {
            warn!(
                "OTP_JWT_SECRET has {} characters; a real deployment requires at least {}",
                token_secret.len(),
                MIN_SECRET_LEN
            );
        }

        let expose_demo_code = std::env::var("OTP_DEMO_EXPOSE_CODE")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if expose_demo_code {
            warn!("OTP_DEMO_EXPOSE_CODE is on: raw codes will appear in responses and logs");
        }

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        AuthConfig {
            token_secret,
            expose_demo_code,
            bind_addr,
        }
    }
}
