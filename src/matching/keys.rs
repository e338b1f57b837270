// src/matching/keys.rs
use crate::matching::address::record_address;
use crate::matching::email::normalize_email;
use crate::matching::phone::phone_candidates;
use crate::matching::url::website_domain;
use crate::models::{field, Record};

/// Normalized matching values of one record. Built once per record so a
/// pairwise pass only compares prepared values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchKeys {
    /// Normalized email, empty when blank.
    pub email: String,
    /// Normalized `phone` followed by the `phones` entries.
    pub phones: Vec<String>,
    /// Website domain (falling back to `domain`), empty when blank.
    pub domain: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
}

impl MatchKeys {
    pub fn from_record(record: &Record) -> Self {
        Self {
            email: record
                .non_blank(field::EMAIL)
                .map(normalize_email)
                .unwrap_or_default(),
            phones: phone_candidates(record),
            domain: website_domain(record),
            name: record.non_blank(field::NAME).map(str::to_string),
            address: record_address(record).map(str::to_string),
            company: record.non_blank(field::COMPANY).map(str::to_string),
        }
    }

    pub fn for_records(records: &[Record]) -> Vec<Self> {
        records.iter().map(Self::from_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::fields_from_pairs;
    use crate::models::{Fields, RecordId, ScopeId};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keys_are_normalized() {
        let record = Record::new(
            RecordId(1),
            ScopeId(1),
            fields_from_pairs([
                ("email", " Info@Acme.COM "),
                ("phone", "+33 6 12 34 56 78"),
                ("phones", "01 45 67 89 12, +33 6 12 34 56 78"),
                ("website", ""),
                ("domain", "https://www.acme.fr/"),
                ("name", "Acme"),
                ("fulladdress", "1 rue A"),
            ]),
        );
        let keys = MatchKeys::from_record(&record);
        assert_eq!(keys.email, "info@acme.com");
        assert_eq!(keys.phones, vec!["+33612345678".to_string(), "0145678912".to_string()]);
        assert_eq!(keys.domain, "acme.fr");
        assert_eq!(keys.name.as_deref(), Some("Acme"));
        assert_eq!(keys.address.as_deref(), Some("1 rue A"));
        assert_eq!(keys.company, None);
    }

    #[test]
    fn test_null_values_give_empty_keys() {
        let fields: Fields = [
            field::EMAIL,
            field::PHONE,
            field::PHONES,
            field::NAME,
            field::WEBSITE,
            field::DOMAIN,
            field::ADDRESS,
            field::FULL_ADDRESS,
            field::COMPANY,
        ]
        .iter()
        .map(|name| (name.to_string(), None))
        .collect();
        let record = Record::new(RecordId(1), ScopeId(1), fields);
        assert_eq!(MatchKeys::from_record(&record), MatchKeys::default());
    }
}
