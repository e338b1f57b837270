// src/matching/email.rs
use crate::matching::keys::MatchKeys;

/// Trimmed, lower-cased email. Blank input gives the empty "no value" sentinel.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Both normalized emails are non-empty and equal.
pub fn emails_match(a: &MatchKeys, b: &MatchKeys) -> bool {
    !a.email.is_empty() && a.email == b.email
}
