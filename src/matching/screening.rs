// src/matching/screening.rs
use log::debug;

use crate::matching::{EquivalenceRules, MatchKeys};
use crate::models::{Fields, ImportSummary, NewRecord, Record, RecordId, ScopeId};

/// Incoming rows with their duplicate flags, ready to insert.
#[derive(Debug, Clone, Default)]
pub struct ImportScreening {
    pub rows: Vec<NewRecord>,
    pub summary: ImportSummary,
}

/// Flags every incoming row that duplicates an existing record or an earlier
/// non-duplicate row of the same batch. Flagged rows are kept, not dropped.
pub fn screen_import(
    rules: &EquivalenceRules,
    existing: &[Record],
    incoming: Vec<Fields>,
) -> ImportScreening {
    let mut screening = ImportScreening::default();
    let existing_keys = MatchKeys::for_records(existing);
    // Keys of the rows of this batch accepted so far.
    let mut accepted: Vec<MatchKeys> = Vec::new();

    for (row_idx, fields) in incoming.into_iter().enumerate() {
        let mut candidate = NewRecord::from_fields(fields).into_record(RecordId(0), ScopeId(0));
        let keys = MatchKeys::from_record(&candidate);
        let is_duplicate = existing_keys
            .iter()
            .chain(accepted.iter())
            .any(|other| rules.keys_match(other, &keys));

        if is_duplicate {
            debug!("Import row {} is a duplicate", row_idx + 1);
            screening.summary.duplicates += 1;
        } else {
            screening.summary.imported += 1;
            accepted.push(keys);
        }

        candidate.is_duplicate = is_duplicate;
        screening.rows.push(NewRecord::from(candidate));
    }
    screening
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::fields_from_pairs;

    fn row(pairs: &[(&str, &str)]) -> Fields {
        fields_from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_rows_matching_existing_records_are_flagged() {
        let rules = EquivalenceRules::default();
        let existing = vec![Record::new(
            RecordId(1),
            ScopeId(1),
            row(&[("email", "shop@nord.fr")]),
        )];
        let screening = screen_import(
            &rules,
            &existing,
            vec![row(&[("email", "SHOP@nord.fr")]), row(&[("email", "new@nord.fr")])],
        );
        assert_eq!(screening.summary, ImportSummary { imported: 1, duplicates: 1 });
        assert!(screening.rows[0].is_duplicate);
        assert!(!screening.rows[1].is_duplicate);
    }

    #[test]
    fn test_in_batch_duplicates_are_flagged() {
        let rules = EquivalenceRules::default();
        let screening = screen_import(
            &rules,
            &[],
            vec![
                row(&[("phone", "+33 6 12 34 56 78")]),
                row(&[("phone", "06 12 34 56 78")]),
                row(&[("phone", "")]),
                row(&[("phone", "")]),
            ],
        );
        let flags: Vec<bool> = screening.rows.iter().map(|r| r.is_duplicate).collect();
        assert_eq!(flags, vec![false, true, false, false]);
        assert_eq!(screening.summary, ImportSummary { imported: 3, duplicates: 1 });
    }

    #[test]
    fn test_duplicates_do_not_seed_further_matches() {
        let rules = EquivalenceRules::default();
        let existing = vec![Record::new(RecordId(1), ScopeId(1), row(&[("email", "a@x.com")]))];
        // Row 0 duplicates the existing record through its email; row 1 only
        // shares row 0's phone, and row 0 was flagged, so row 1 is new.
        let screening = screen_import(
            &rules,
            &existing,
            vec![
                row(&[("email", "a@x.com"), ("phone", "0699999999")]),
                row(&[("phone", "0699999999")]),
            ],
        );
        let flags: Vec<bool> = screening.rows.iter().map(|r| r.is_duplicate).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn test_null_rows_are_not_duplicates() {
        let rules = EquivalenceRules::default();
        let null_row: Fields = ["email", "phone", "phones", "name", "website", "address"]
            .iter()
            .map(|name| (name.to_string(), None))
            .collect();
        let existing = vec![Record::new(RecordId(1), ScopeId(1), null_row.clone())];
        let screening = screen_import(&rules, &existing, vec![null_row.clone(), null_row]);
        assert_eq!(screening.summary, ImportSummary { imported: 2, duplicates: 0 });
    }
}
