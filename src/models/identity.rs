// src/models/identity.rs
//! Claimant identity handling.
//!
//! An identity is an e-mail address restricted to the corporate domain.
//! Every identity is normalized (trimmed, lower-cased) before any comparison,
//! embedding or storage, so case and whitespace variations never produce
//! distinct identities. Also provides the display helpers the mail template
//! and audit logs use: a human name derived from the local part, and a masked
//! rendering that keeps addresses out of logs.

use once_cell::sync::Lazy;
use regex::Regex;

/// The only e-mail domain eligible for OTP issuance.
pub const CORPORATE_DOMAIN: &str = "protege.com.br";

/// Eligibility pattern: a syntactically valid local part followed by the
/// exact corporate domain, case-insensitive.
static CORPORATE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^[a-z0-9._%+\-]+@{}$",
        regex::escape(CORPORATE_DOMAIN)
    ))
    .expect("invalid corporate e-mail pattern")
});

/// Normalizes a claimed identity: trims surrounding whitespace and
/// lower-cases the whole address.
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks whether an address belongs to the corporate domain.
///
/// The check is mandatory at issuance time and cannot be bypassed by any
/// client-supplied flag. It accepts raw (un-normalized) input; the match is
/// case-insensitive and ignores surrounding whitespace.
pub fn is_corporate_email(email: &str) -> bool {
    CORPORATE_EMAIL.is_match(email.trim())
}

/// Derives a display name from the local part of an address.
///
/// Dot-separated words are capitalized: `"user.name@..."` becomes
/// `"User Name"`. Used for the greeting in the OTP e-mail.
pub fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("");
    local
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Masks an address for log output: first and last character of the local
/// part with up to four bullets in between (`"eduardo@..."` becomes
/// `"e••••o@..."`). Addresses with a local part of two characters or fewer
/// are returned unchanged; there is nothing meaningful to hide.
pub fn mask(email: &str) -> String {
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return email.to_string(),
    };
    let chars: Vec<char> = local.chars().collect();
    if chars.len() <= 2 {
        return email.to_string();
    }
    let bullets = "•".repeat((chars.len() - 2).min(4));
    format!("{}{}{}@{}", chars[0], bullets, chars[chars.len() - 1], domain)
}
