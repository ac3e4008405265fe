//! Temporary console passwords.
//!
//! Passwords are drawn from the operating system CSPRNG. A random draw can
//! still miss a character class, so fixed positions get patched afterwards:
//! position 0 with an uppercase letter, 1 with a lowercase letter, 2 with a
//! digit, each only when that class is missing. The complexity floor is
//! guaranteed, not statistical.

use rand::rngs::OsRng;
use rand::Rng;

/// Characters a password may contain.
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Length of every generated password.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Generate a temporary password of `length` characters containing at
/// least one uppercase letter, one lowercase letter and one digit.
///
/// # Panics
///
/// Panics when `length < 3`; three positions are reserved for the
/// guaranteed character classes.
pub fn generate_password(length: usize) -> String {
    assert!(length >= 3, "passwords need room for all character classes");

    let mut chars: Vec<u8> = (0..length)
        .map(|_| PASSWORD_CHARSET[OsRng.gen_range(0..PASSWORD_CHARSET.len())])
        .collect();

    // A patch can evict the only member of a class checked earlier (the
    // sole uppercase sitting at position 2, say), so patch until the floor
    // holds. Almost every draw needs zero or one pass.
    while !meets_floor(&chars) {
        if !chars.iter().any(u8::is_ascii_uppercase) {
            chars[0] = OsRng.gen_range(b'A'..=b'Z');
        }
        if !chars.iter().any(u8::is_ascii_lowercase) {
            chars[1] = OsRng.gen_range(b'a'..=b'z');
        }
        if !chars.iter().any(u8::is_ascii_digit) {
            chars[2] = OsRng.gen_range(b'0'..=b'9');
        }
    }

    chars.into_iter().map(char::from).collect()
}

fn meets_floor(chars: &[u8]) -> bool {
    chars.iter().any(u8::is_ascii_uppercase)
        && chars.iter().any(u8::is_ascii_lowercase)
        && chars.iter().any(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn classes(password: &str) -> (bool, bool, bool) {
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_digit()),
        )
    }

    #[test]
    fn test_length_and_charset() {
        let password = generate_password(DEFAULT_PASSWORD_LENGTH);
        assert_eq!(password.len(), 16);
        assert!(password.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
    }

    #[test]
    fn test_complexity_floor_holds_across_many_samples() {
        for _ in 0..200 {
            let password = generate_password(16);
            let (upper, lower, digit) = classes(&password);
            assert!(upper, "missing uppercase in {password}");
            assert!(lower, "missing lowercase in {password}");
            assert!(digit, "missing digit in {password}");
        }
    }

    #[test]
    fn test_minimum_length_still_covers_all_classes() {
        // Three characters force a patch at every position.
        for _ in 0..100 {
            let password = generate_password(3);
            let (upper, lower, digit) = classes(&password);
            assert!(upper && lower && digit, "incomplete classes in {password}");
        }
    }

    #[test]
    fn test_small_sample_has_no_duplicates() {
        let sample: HashSet<String> = (0..50).map(|_| generate_password(16)).collect();
        assert_eq!(sample.len(), 50);
    }

    #[test]
    #[should_panic(expected = "character classes")]
    fn test_too_short_panics() {
        let _ = generate_password(2);
    }
}
