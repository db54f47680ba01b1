// src/services/mailer.rs
//! Outbound delivery of one-time codes.
//!
//! Issuance only depends on the [`OtpMailer`] trait, so the delivery channel
//! can be swapped without touching the issue flow. The default
//! [`LogMailer`] writes an audit line instead of sending real e-mail; it is
//! what the demo deployment runs with.

use anyhow::Result;
use log::info;

use crate::models::identity;

/// Delivery channel for one-time codes.
pub trait OtpMailer: Send + Sync {
    /// Delivers `code` to `recipient`, addressing them by `display_name`.
    ///
    /// # Arguments
    /// * `recipient` - Normalized e-mail address of the user
    /// * `display_name` - Human-readable name derived from the address
    /// * `code` - The 6-digit one-time code
    fn deliver(&self, recipient: &str, display_name: &str, code: &str) -> Result<()>;
}

/// Mailer that records delivery in the application log instead of sending
/// anything. The code itself never appears in the line it writes.
pub struct LogMailer;

impl OtpMailer for LogMailer {
    fn deliver(&self, recipient: &str, display_name: &str, _code: &str) -> Result<()> {
        info!(
            "[2FA] delivering code to {} ({})",
            identity::mask(recipient),
            display_name
        );
        Ok(())
    }
}
