// src/clustering/duplicate_groups.rs
use log::debug;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;
use std::time::Instant;

use crate::config::{GroupingStrategy, MatchingConfig};
use crate::matching::{EquivalenceRules, MatchKeys};
use crate::models::{DuplicateGroup, MatchRule, Record};

/// Partitions a record snapshot into duplicate groups.
#[derive(Debug, Clone, Default)]
pub struct DuplicateGrouper {
    rules: EquivalenceRules,
}

impl DuplicateGrouper {
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            rules: EquivalenceRules::new(config),
        }
    }

    pub fn with_rules(rules: EquivalenceRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &EquivalenceRules {
        &self.rules
    }

    /// Groups of two or more records, ordered by their first record's input
    /// position. Each record lands in at most one group.
    pub fn group(&self, records: &[Record]) -> Vec<DuplicateGroup> {
        let start = Instant::now();
        let strategy = self.rules.config().grouping_strategy;
        let groups = match strategy {
            GroupingStrategy::Star => self.group_star(records),
            GroupingStrategy::Transitive => self.group_transitive(records),
        };
        debug!(
            "Grouped {} records into {} duplicate groups ({} strategy) in {:.2?}",
            records.len(),
            groups.len(),
            strategy.as_str(),
            start.elapsed()
        );
        groups
    }

    /// Single greedy pass. Every later unclaimed record is tested against the
    /// seed only, never against members added after it, so A~B~C without A~C
    /// yields {A, B} and leaves C out.
    fn group_star(&self, records: &[Record]) -> Vec<DuplicateGroup> {
        let n = records.len();
        let keys = MatchKeys::for_records(records);
        let mut claimed = vec![false; n];
        let mut groups = Vec::new();

        for i in 0..n {
            if claimed[i] {
                continue;
            }
            let seed = &records[i];
            let mut members = vec![seed.clone()];
            let mut matched_by = Vec::new();

            for j in (i + 1)..n {
                if claimed[j] {
                    continue;
                }
                if let Some(rule) = self.rules.first_matching_rule(&keys[i], &keys[j]) {
                    members.push(records[j].clone());
                    matched_by.push(rule);
                    claimed[j] = true;
                }
            }

            if members.len() > 1 {
                claimed[i] = true;
                groups.push(DuplicateGroup::new(members, matched_by));
            }
        }
        groups
    }

    /// Connected components over all duplicate pairs. A member's reported rule
    /// is the first rule seen on any of its pairs.
    fn group_transitive(&self, records: &[Record]) -> Vec<DuplicateGroup> {
        let n = records.len();
        let keys = MatchKeys::for_records(records);
        let mut components = UnionFind::<usize>::new(n);
        let mut first_rule: Vec<Option<MatchRule>> = vec![None; n];

        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(rule) = self.rules.first_matching_rule(&keys[i], &keys[j]) {
                    components.union(i, j);
                    first_rule[i].get_or_insert(rule);
                    first_rule[j].get_or_insert(rule);
                }
            }
        }

        let labels = components.into_labeling();
        let mut label_order: Vec<usize> = Vec::new();
        let mut members_by_label: HashMap<usize, Vec<usize>> = HashMap::new();
        for (idx, label) in labels.into_iter().enumerate() {
            members_by_label
                .entry(label)
                .or_insert_with(|| {
                    label_order.push(label);
                    Vec::new()
                })
                .push(idx);
        }

        label_order
            .into_iter()
            .filter_map(|label| members_by_label.remove(&label))
            .filter(|indices| indices.len() > 1)
            .map(|indices| {
                let members = indices.iter().map(|&idx| records[idx].clone()).collect();
                let matched_by = indices[1..].iter().filter_map(|&idx| first_rule[idx]).collect();
                DuplicateGroup::new(members, matched_by)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{record::fields_from_pairs, Fields, RecordId, ScopeId};
    use pretty_assertions::assert_eq;

    fn record(id: i64, pairs: &[(&str, &str)]) -> Record {
        Record::new(RecordId(id), ScopeId(1), fields_from_pairs(pairs.iter().copied()))
    }

    fn group_ids(groups: &[DuplicateGroup]) -> Vec<Vec<i64>> {
        groups
            .iter()
            .map(|g| g.records().iter().map(|r| r.id.0).collect())
            .collect()
    }

    fn transitive() -> DuplicateGrouper {
        DuplicateGrouper::new(MatchingConfig {
            grouping_strategy: GroupingStrategy::Transitive,
            ..MatchingConfig::default()
        })
    }

    #[test]
    fn test_blank_records_form_no_group() {
        let blank = record(1, &[("email", ""), ("phone", ""), ("name", "")]);
        let mut copy = blank.clone();
        copy.id = RecordId(2);
        assert!(DuplicateGrouper::default().group(&[blank, copy]).is_empty());
    }

    #[test]
    fn test_email_case_insensitive_grouping() {
        let records = vec![record(1, &[("email", "A@B.com")]), record(2, &[("email", "a@b.com")])];
        let groups = DuplicateGrouper::default().group(&records);
        assert_eq!(group_ids(&groups), vec![vec![1, 2]]);
        assert_eq!(groups[0].matched_by(), &[MatchRule::Email]);
    }

    #[test]
    fn test_phone_suffix_grouping() {
        let grouper = DuplicateGrouper::default();
        let records = vec![
            record(1, &[("phone", "+33612345678")]),
            record(2, &[("phone", "0612345678")]),
        ];
        assert_eq!(group_ids(&grouper.group(&records)), vec![vec![1, 2]]);

        let unrelated = vec![
            record(3, &[("phone", "612345678")]),
            record(4, &[("phone", "512345678")]),
        ];
        assert!(grouper.group(&unrelated).is_empty());
    }

    #[test]
    fn test_star_grouping_around_seed() {
        let records = vec![
            record(1, &[("email", "x@y.com"), ("phone", "0611111111")]),
            record(2, &[("email", "x@y.com")]),
            record(3, &[("email", "other@y.com"), ("phone", "06 11 11 11 11")]),
        ];
        let groups = DuplicateGrouper::default().group(&records);
        assert_eq!(group_ids(&groups), vec![vec![1, 2, 3]]);
        assert_eq!(groups[0].matched_by(), &[MatchRule::Email, MatchRule::Phone]);
    }

    #[test]
    fn test_star_grouping_does_not_chain() {
        // 1 and 2 share an email, 2 and 3 share a phone, 1 and 3 share nothing.
        let records = vec![
            record(1, &[("email", "x@y.com")]),
            record(2, &[("email", "x@y.com"), ("phone", "0622222222")]),
            record(3, &[("email", "z@y.com"), ("phone", "0622222222")]),
        ];
        let groups = DuplicateGrouper::default().group(&records);
        assert_eq!(group_ids(&groups), vec![vec![1, 2]]);
    }

    #[test]
    fn test_claimed_records_are_not_reused() {
        let records = vec![
            record(1, &[("email", "a@x.com")]),
            record(2, &[("email", "b@x.com"), ("phone", "0633333333")]),
            record(3, &[("email", "a@x.com"), ("phone", "0633333333")]),
            record(4, &[("phone", "0633333333")]),
        ];
        // 3 is claimed by seed 1, so seed 2 only collects 4.
        let groups = DuplicateGrouper::default().group(&records);
        assert_eq!(group_ids(&groups), vec![vec![1, 3], vec![2, 4]]);
    }

    #[test]
    fn test_groups_always_have_two_or_more_records() {
        let records: Vec<Record> = (0..12)
            .map(|i| {
                let email = format!("user{}@x.com", i % 4);
                let phone = if i % 3 == 0 { "0600000000".to_string() } else { String::new() };
                record(i, &[("email", email.as_str()), ("phone", phone.as_str())])
            })
            .collect();
        for grouper in [DuplicateGrouper::default(), transitive()] {
            let groups = grouper.group(&records);
            assert!(!groups.is_empty());
            assert!(groups.iter().all(|g| g.len() >= 2));
            assert!(groups.iter().all(|g| g.matched_by().len() == g.len() - 1));
            let mut seen: Vec<i64> = groups.iter().flat_map(|g| g.ids()).map(|id| id.0).collect();
            let total = seen.len();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), total);
        }
    }

    #[test]
    fn test_transitive_grouping_joins_chains() {
        let records = vec![
            record(1, &[("email", "x@y.com")]),
            record(2, &[("email", "x@y.com"), ("phone", "0622222222")]),
            record(3, &[("email", "z@y.com"), ("phone", "0622222222")]),
            record(4, &[("email", "lonely@y.com")]),
        ];
        let groups = transitive().group(&records);
        assert_eq!(group_ids(&groups), vec![vec![1, 2, 3]]);
        assert_eq!(groups[0].matched_by(), &[MatchRule::Email, MatchRule::Phone]);
    }

    #[test]
    fn test_null_records_form_no_group() {
        let fields: Fields = ["email", "phone", "phones", "name", "website", "address"]
            .iter()
            .map(|name| (name.to_string(), None))
            .collect();
        let records = vec![
            Record::new(RecordId(1), ScopeId(1), fields.clone()),
            Record::new(RecordId(2), ScopeId(1), fields),
        ];
        assert!(DuplicateGrouper::default().group(&records).is_empty());
        assert!(transitive().group(&records).is_empty());
    }

    #[test]
    fn test_grouping_thousands_of_records() {
        let mut records: Vec<Record> = (0..3000)
            .map(|i| {
                let email = format!("contact{}@example.com", i);
                let name = format!("Contact {}", i);
                let phone = format!("06{:08}", i);
                let phones = format!("01{:08}, 02{:08}", i, i);
                record(
                    i,
                    &[
                        ("email", email.as_str()),
                        ("name", name.as_str()),
                        ("phone", phone.as_str()),
                        ("phones", phones.as_str()),
                        ("website", "https://www.example.com"),
                    ],
                )
            })
            .collect();
        let grouper = DuplicateGrouper::default();
        let start = Instant::now();
        assert!(grouper.group(&records).is_empty());
        debug!("Grouped 3000 distinct records in {:.2?}", start.elapsed());

        records.push(record(3000, &[("email", "CONTACT17@example.com")]));
        records.push(record(3001, &[("phones", "+33 2 00 00 20 99")]));
        let groups = grouper.group(&records);
        assert_eq!(group_ids(&groups), vec![vec![17, 3000], vec![2099, 3001]]);
        assert_eq!(groups[0].matched_by(), &[MatchRule::Email]);
        assert_eq!(groups[1].matched_by(), &[MatchRule::Phone]);
    }

    #[test]
    fn test_empty_input() {
        assert!(DuplicateGrouper::default().group(&[]).is_empty());
        assert!(transitive().group(&[]).is_empty());
    }
}
