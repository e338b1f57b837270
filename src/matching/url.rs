// src/matching/url.rs
use crate::matching::keys::MatchKeys;
use crate::matching::name::same_name;
use crate::models::{field, Record};

const STRIPPED_PREFIXES: &[&str] = &["https://", "http://", "www."];

/// Host part of a URL: scheme and leading `www.` removed, cut at the first
/// `/`, lower-cased. Anything unparseable just passes through lower-cased.
pub fn domain_of(url_or_host: &str) -> String {
    let lowered = url_or_host.to_lowercase();
    let mut rest = lowered.trim();
    loop {
        let before = rest;
        for prefix in STRIPPED_PREFIXES {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                rest = stripped.trim_start();
            }
        }
        if rest == before {
            break;
        }
    }
    let host = match rest.find('/') {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    host.trim().to_string()
}

/// Domain of `website`, falling back to `domain` when the website is blank.
pub fn website_domain(record: &Record) -> String {
    record
        .non_blank_or(field::WEBSITE, field::DOMAIN)
        .map(domain_of)
        .unwrap_or_default()
}

/// Same non-blank name and same non-empty website domain.
pub fn name_website_match(a: &MatchKeys, b: &MatchKeys) -> bool {
    same_name(a, b) && !a.domain.is_empty() && a.domain == b.domain
}
