// src/models/record.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field name to value. `None` and whitespace-only values are both "blank".
pub type Fields = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one imported database; every record belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub i64);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical field names. Header aliases (`Email`, `Fulladdress`, ...) are
/// mapped onto these before records reach the matching code.
pub mod field {
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const PHONES: &str = "phones";
    pub const NAME: &str = "name";
    pub const WEBSITE: &str = "website";
    pub const DOMAIN: &str = "domain";
    pub const ADDRESS: &str = "address";
    pub const FULL_ADDRESS: &str = "fulladdress";
    pub const COMPANY: &str = "company";
    pub const NOTES: &str = "notes";
}

/// Identity and store linkage keys. Never copied between records on merge.
pub const RESERVED_FIELDS: &[&str] = &["id", "merged", "database_id", "is_duplicate", "file_id"];

pub fn is_reserved_field(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub database_id: ScopeId,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub is_duplicate: bool,
}

impl Record {
    pub fn new(id: RecordId, database_id: ScopeId, fields: Fields) -> Self {
        Self {
            id,
            database_id,
            fields,
            merged: false,
            is_duplicate: false,
        }
    }

    /// Raw stored value; may be empty.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// Stored value as-is, or `None` when it is blank.
    pub fn non_blank(&self, field: &str) -> Option<&str> {
        let value = self.get(field);
        if is_blank(value) {
            None
        } else {
            value
        }
    }

    /// `primary` when non-blank, otherwise `fallback` when non-blank.
    pub fn non_blank_or(&self, primary: &str, fallback: &str) -> Option<&str> {
        self.non_blank(primary).or_else(|| self.non_blank(fallback))
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), Some(value.into()));
    }
}

/// A record that has not been assigned an id by the store yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    #[serde(default)]
    pub fields: Fields,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub is_duplicate: bool,
}

impl NewRecord {
    pub fn from_fields(fields: Fields) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn into_record(self, id: RecordId, database_id: ScopeId) -> Record {
        Record {
            id,
            database_id,
            fields: self.fields,
            merged: self.merged,
            is_duplicate: self.is_duplicate,
        }
    }
}

impl From<Record> for NewRecord {
    fn from(record: Record) -> Self {
        Self {
            fields: record.fields,
            merged: record.merged,
            is_duplicate: record.is_duplicate,
        }
    }
}

/// Builds a `Fields` map from string pairs; empty strings are kept as `Some("")`.
pub fn fields_from_pairs<'a, I>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Some(v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some(" x ")));
    }

    #[test]
    fn test_non_blank_fallback() {
        let record = Record::new(
            RecordId(1),
            ScopeId(1),
            fields_from_pairs([("address", "  "), ("fulladdress", "1 Main St")]),
        );
        assert_eq!(record.non_blank(field::ADDRESS), None);
        assert_eq!(
            record.non_blank_or(field::ADDRESS, field::FULL_ADDRESS),
            Some("1 Main St")
        );
        assert_eq!(record.non_blank(field::EMAIL), None);
    }

    #[test]
    fn test_null_values_are_blank() {
        let mut fields = Fields::new();
        fields.insert(field::ADDRESS.to_string(), None);
        fields.insert(field::FULL_ADDRESS.to_string(), Some("1 Main St".to_string()));
        let record = Record::new(RecordId(1), ScopeId(1), fields);
        assert_eq!(record.get(field::ADDRESS), None);
        assert_eq!(record.non_blank(field::ADDRESS), None);
        assert_eq!(
            record.non_blank_or(field::ADDRESS, field::FULL_ADDRESS),
            Some("1 Main St")
        );
    }

    #[test]
    fn test_reserved_fields() {
        assert!(is_reserved_field("id"));
        assert!(is_reserved_field("database_id"));
        assert!(!is_reserved_field("notes"));
    }
}
