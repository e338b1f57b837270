// src/matching/address.rs
use crate::matching::keys::MatchKeys;
use crate::matching::name::{same_name, same_value};
use crate::models::{field, Record};

/// `address`, or `fulladdress` when the short form is blank.
pub fn record_address(record: &Record) -> Option<&str> {
    record.non_blank_or(field::ADDRESS, field::FULL_ADDRESS)
}

/// Same non-blank name and the exact same non-blank address.
pub fn name_address_match(a: &MatchKeys, b: &MatchKeys) -> bool {
    same_name(a, b) && same_value(a.address.as_deref(), b.address.as_deref())
}
