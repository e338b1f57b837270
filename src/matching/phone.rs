// src/matching/phone.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MatchingConfig;
use crate::matching::keys::MatchKeys;
use crate::models::{field, Record};

static PHONE_LIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*").expect("phone list separator regex is valid"));

/// Digits only, keeping one `+` if it comes before the first digit.
/// Returns an empty string when the input has no digits at all.
pub fn normalize_phone(phone: &str) -> String {
    let mut normalized = String::with_capacity(phone.len());
    let mut seen_digit = false;
    for c in phone.chars() {
        if c.is_ascii_digit() {
            seen_digit = true;
            normalized.push(c);
        } else if c == '+' && !seen_digit && normalized.is_empty() {
            normalized.push('+');
        }
    }
    if !seen_digit {
        return String::new();
    }
    normalized
}

/// Splits a comma-joined `phones` value into normalized, non-empty numbers.
pub fn split_phone_list(phones: &str) -> Vec<String> {
    PHONE_LIST_SEPARATOR
        .split(phones)
        .map(normalize_phone)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Drops the international `+` and national trunk zeros so that
/// `+33612345678` and `0612345678` line up on their trailing digits.
fn significant_digits(normalized: &str) -> &str {
    normalized.trim_start_matches('+').trim_start_matches('0')
}

/// One number ends with the other once prefixes are ignored. Numbers made of
/// nothing but `+` and zeros have no significant digits; such pairs are
/// compared on their digits with only the `+` removed.
pub fn is_suffix_match(a: &str, b: &str, min_digits: usize) -> bool {
    let (sig_a, sig_b) = match (significant_digits(a), significant_digits(b)) {
        ("", _) | (_, "") => (a.trim_start_matches('+'), b.trim_start_matches('+')),
        sig => sig,
    };
    let min_digits = min_digits.max(1);
    if sig_a.len() < min_digits || sig_b.len() < min_digits {
        return false;
    }
    sig_a.ends_with(sig_b) || sig_b.ends_with(sig_a)
}

pub fn phones_equivalent(a: &str, b: &str, config: &MatchingConfig) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || (config.phone_suffix_match && is_suffix_match(a, b, config.phone_suffix_min_digits))
}

/// Normalized `phone` followed by every entry of `phones`.
pub fn phone_candidates(record: &Record) -> Vec<String> {
    let mut candidates = Vec::new();
    if let Some(phone) = record.non_blank(field::PHONE) {
        let normalized = normalize_phone(phone);
        if !normalized.is_empty() {
            candidates.push(normalized);
        }
    }
    if let Some(phones) = record.non_blank(field::PHONES) {
        for phone in split_phone_list(phones) {
            if !candidates.contains(&phone) {
                candidates.push(phone);
            }
        }
    }
    candidates
}

/// Any phone of `a` is equivalent to any phone of `b`.
pub fn phones_match(a: &MatchKeys, b: &MatchKeys, config: &MatchingConfig) -> bool {
    a.phones
        .iter()
        .any(|pa| b.phones.iter().any(|pb| phones_equivalent(pa, pb, config)))
}
