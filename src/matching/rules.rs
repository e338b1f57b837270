// src/matching/rules.rs
use crate::config::MatchingConfig;
use crate::matching::keys::MatchKeys;
use crate::matching::{address, email, name, phone, url};
use crate::models::{MatchRule, Record};

/// The duplicate definition: a pair is a duplicate when any enabled rule fires.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceRules {
    config: MatchingConfig,
}

impl EquivalenceRules {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn is_enabled(&self, rule: MatchRule) -> bool {
        match rule {
            MatchRule::NameCompany => self.config.name_company_rule,
            _ => true,
        }
    }

    pub fn rule_matches(&self, rule: MatchRule, a: &MatchKeys, b: &MatchKeys) -> bool {
        if !self.is_enabled(rule) {
            return false;
        }
        match rule {
            MatchRule::Email => email::emails_match(a, b),
            MatchRule::Phone => phone::phones_match(a, b, &self.config),
            MatchRule::NameWebsite => url::name_website_match(a, b),
            MatchRule::NameAddress => address::name_address_match(a, b),
            MatchRule::NameCompany => name::name_company_match(a, b),
        }
    }

    /// First rule, in precedence order, under which two prepared records are
    /// duplicates.
    pub fn first_matching_rule(&self, a: &MatchKeys, b: &MatchKeys) -> Option<MatchRule> {
        MatchRule::PRECEDENCE
            .into_iter()
            .find(|rule| self.rule_matches(*rule, a, b))
    }

    pub fn keys_match(&self, a: &MatchKeys, b: &MatchKeys) -> bool {
        self.first_matching_rule(a, b).is_some()
    }

    /// Same as `first_matching_rule`, normalizing both records on the spot.
    /// Passes over many records should build `MatchKeys` once instead.
    pub fn matching_rule(&self, a: &Record, b: &Record) -> Option<MatchRule> {
        self.first_matching_rule(&MatchKeys::from_record(a), &MatchKeys::from_record(b))
    }

    pub fn matches(&self, a: &Record, b: &Record) -> bool {
        self.matching_rule(a, b).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{record::fields_from_pairs, Fields, RecordId, ScopeId};

    fn record(id: i64, pairs: &[(&str, &str)]) -> Record {
        Record::new(RecordId(id), ScopeId(1), fields_from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_precedence_reports_first_rule() {
        let rules = EquivalenceRules::default();
        let a = record(1, &[("email", "x@y.com"), ("phone", "0612345678")]);
        let b = record(2, &[("email", "X@Y.com"), ("phone", "0612345678")]);
        assert_eq!(rules.matching_rule(&a, &b), Some(MatchRule::Email));

        let c = record(3, &[("email", "z@y.com"), ("phone", "06 12 34 56 78")]);
        assert_eq!(rules.matching_rule(&a, &c), Some(MatchRule::Phone));
    }

    #[test]
    fn test_name_rules() {
        let rules = EquivalenceRules::default();
        let a = record(
            1,
            &[
                ("name", "Studio K"),
                ("website", "studiok.io"),
                ("address", "3 Quai Ouest"),
                ("company", "K SARL"),
            ],
        );
        let by_site = record(2, &[("name", "Studio K"), ("website", "https://studiok.io/")]);
        let by_address = record(3, &[("name", "Studio K"), ("address", "3 Quai Ouest")]);
        let by_company = record(4, &[("name", "Studio K"), ("company", "K SARL")]);
        assert_eq!(rules.matching_rule(&a, &by_site), Some(MatchRule::NameWebsite));
        assert_eq!(rules.matching_rule(&a, &by_address), Some(MatchRule::NameAddress));
        assert_eq!(rules.matching_rule(&a, &by_company), Some(MatchRule::NameCompany));
        assert!(!rules.matches(&by_site, &by_address));
    }

    #[test]
    fn test_name_company_rule_can_be_disabled() {
        let rules = EquivalenceRules::new(MatchingConfig {
            name_company_rule: false,
            ..MatchingConfig::default()
        });
        let a = record(1, &[("name", "Studio K"), ("company", "K SARL")]);
        let b = record(2, &[("name", "Studio K"), ("company", "K SARL")]);
        assert!(!rules.matches(&a, &b));
    }

    #[test]
    fn test_all_blank_records_never_match() {
        let rules = EquivalenceRules::default();
        let blank = record(
            1,
            &[
                ("email", ""),
                ("phone", ""),
                ("phones", ""),
                ("name", ""),
                ("website", ""),
                ("address", ""),
                ("company", ""),
            ],
        );
        let mut copy = blank.clone();
        copy.id = RecordId(2);
        assert!(!rules.matches(&blank, &copy));
    }

    #[test]
    fn test_all_null_records_never_match() {
        let rules = EquivalenceRules::default();
        let fields: Fields = ["email", "phone", "phones", "name", "website", "address", "company"]
            .iter()
            .map(|name| (name.to_string(), None))
            .collect();
        let a = Record::new(RecordId(1), ScopeId(1), fields.clone());
        let b = Record::new(RecordId(2), ScopeId(1), fields);
        assert!(!rules.matches(&a, &b));
        assert_eq!(
            rules.first_matching_rule(&MatchKeys::from_record(&a), &MatchKeys::from_record(&b)),
            None
        );
    }

    #[test]
    fn test_rules_are_symmetric() {
        let rules = EquivalenceRules::default();
        let a = record(1, &[("phone", "+33612345678")]);
        let b = record(2, &[("phones", "0612345678, 0145678912")]);
        assert!(rules.matches(&a, &b));
        assert!(rules.matches(&b, &a));
    }
}
