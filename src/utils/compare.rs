// src/utils/compare.rs
//! Timing-safe string comparison.
//!
//! Secret-bearing values (the submitted OTP, the identity embedded in a
//! credential, the credential signature) must never be compared with `==`:
//! a short-circuiting comparison leaks, through execution time, the position
//! of the first differing byte. This module provides the constant-time
//! primitive used everywhere such a value is matched.

/// Compares two strings without leaking where they first differ.
///
/// The length check is allowed to return early: lengths are not secret in
/// this protocol (OTPs are always 6 digits, signatures always 43 base64url
/// characters). For equal-length inputs the function XORs every byte pair
/// into an accumulator and inspects it only once, after the loop, so the
/// amount of work depends on the length alone, never on the contents.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// `true` if and only if `a` and `b` are byte-for-byte identical.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut acc: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        acc |= x ^ y;
    }
    acc == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_strings_match() {
        assert!(constant_time_eq("483920", "483920"));
        assert!(constant_time_eq("user.name@protege.com.br", "user.name@protege.com.br"));
    }

    #[test]
    fn test_empty_strings_match() {
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_difference_in_first_byte() {
        assert!(!constant_time_eq("983920", "483920"));
    }

    #[test]
    fn test_difference_in_last_byte() {
        assert!(!constant_time_eq("483921", "483920"));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!constant_time_eq("48392", "483920"));
        assert!(!constant_time_eq("483920", ""));
    }

    #[test]
    fn test_multiple_differences() {
        assert!(!constant_time_eq("000000", "999999"));
    }
}
