// src/matching/name.rs
use crate::matching::keys::MatchKeys;

/// Both values present and identical.
pub(crate) fn same_value(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Names are compared exactly as stored; both must be non-blank.
pub fn same_name(a: &MatchKeys, b: &MatchKeys) -> bool {
    same_value(a.name.as_deref(), b.name.as_deref())
}

/// Same non-blank name and same non-blank company (legacy rule).
pub fn name_company_match(a: &MatchKeys, b: &MatchKeys) -> bool {
    same_name(a, b) && same_value(a.company.as_deref(), b.company.as_deref())
}
