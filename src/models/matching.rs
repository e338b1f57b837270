// src/models/matching.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::record::{Record, RecordId};

/// The equivalence rules, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Email,
    Phone,
    NameWebsite,
    NameAddress,
    NameCompany,
}

impl MatchRule {
    pub const PRECEDENCE: [MatchRule; 5] = [
        MatchRule::Email,
        MatchRule::Phone,
        MatchRule::NameWebsite,
        MatchRule::NameAddress,
        MatchRule::NameCompany,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Email => "email",
            MatchRule::Phone => "phone",
            MatchRule::NameWebsite => "name_website",
            MatchRule::NameAddress => "name_address",
            MatchRule::NameCompany => "name_company",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records judged to be the same entity. The first record is the anchor.
///
/// Groups built by the grouper always have two or more records and
/// `matched_by[k]` names the rule that pulled `records[k + 1]` in. Groups
/// deserialized from a caller may carry no rules at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    records: Vec<Record>,
    #[serde(default)]
    matched_by: Vec<MatchRule>,
}

impl DuplicateGroup {
    pub(crate) fn new(records: Vec<Record>, matched_by: Vec<MatchRule>) -> Self {
        debug_assert_eq!(records.len(), matched_by.len() + 1);
        Self {
            records,
            matched_by,
        }
    }

    /// Wraps a caller-supplied list, e.g. a group posted back for merging.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            matched_by: Vec::new(),
        }
    }

    pub fn anchor(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn matched_by(&self) -> &[MatchRule] {
        &self.matched_by
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id).collect()
    }
}
