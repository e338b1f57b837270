// src/consolidation/exact.rs
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::matching::address::record_address;
use crate::models::{field, Record, RecordId};

/// SHA-256 over the raw `[name, address, phone, website]` values.
pub fn exact_key(record: &Record) -> String {
    let snapshot = json!([
        record.non_blank(field::NAME),
        record_address(record),
        record.non_blank(field::PHONE),
        record.non_blank(field::WEBSITE),
    ]);
    let mut hasher = Sha256::new();
    hasher.update(snapshot.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Ids of records whose exact key was already seen on a lower id.
/// Records with every key field blank are never reported.
pub fn find_exact_duplicates(records: &[Record]) -> Vec<RecordId> {
    let mut ordered: Vec<&Record> = records.iter().collect();
    ordered.sort_by_key(|r| r.id);

    let mut seen = HashSet::new();
    let mut to_delete = Vec::new();
    for record in ordered {
        let all_blank = record.non_blank(field::NAME).is_none()
            && record_address(record).is_none()
            && record.non_blank(field::PHONE).is_none()
            && record.non_blank(field::WEBSITE).is_none();
        if all_blank {
            continue;
        }
        if !seen.insert(exact_key(record)) {
            to_delete.push(record.id);
        }
    }
    to_delete
}
