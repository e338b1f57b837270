// src/consolidation/merge.rs
use log::debug;

use crate::errors::DedupeError;
use crate::models::record::{is_blank, is_reserved_field, Record};
use crate::models::{field, DuplicateGroup};

/// Values a field picked up from non-anchor records, in first-seen order.
#[derive(Debug, Default)]
struct Contributions {
    fields: Vec<(String, Vec<String>)>,
}

impl Contributions {
    fn push(&mut self, field_name: &str, value: &str) {
        match self.fields.iter_mut().find(|(name, _)| name == field_name) {
            Some((_, values)) => values.push(value.to_string()),
            None => self
                .fields
                .push((field_name.to_string(), vec![value.to_string()])),
        }
    }

    fn note_lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(name, values)| format!("Merged {}: {}", name, values.join(", ")))
            .collect()
    }
}

/// Folds a duplicate group into one record.
pub fn merge_group(group: &DuplicateGroup) -> Result<Record, DedupeError> {
    merge_records(group.records())
}

/// Folds `records` into a copy of the first one.
///
/// Blank anchor fields are filled from later records; differing non-blank
/// values are kept out of the field and archived as `Merged <field>: ...`
/// lines in `notes`, so no non-blank value is lost. A single record comes
/// back unchanged.
pub fn merge_records(records: &[Record]) -> Result<Record, DedupeError> {
    let (anchor, rest) = records.split_first().ok_or(DedupeError::EmptyGroup)?;
    if rest.is_empty() {
        return Ok(anchor.clone());
    }

    let mut merged = anchor.clone();
    let mut contributions = Contributions::default();

    for other in rest {
        for (field_name, value) in &other.fields {
            if is_reserved_field(field_name) {
                continue;
            }
            let value = match value.as_deref() {
                Some(v) if !is_blank(Some(v)) => v,
                _ => continue,
            };
            match merged.non_blank(field_name) {
                None => {
                    merged.set(field_name.as_str(), value);
                    contributions.push(field_name, value);
                }
                Some(current) if current != value => {
                    contributions.push(field_name, value);
                }
                Some(_) => {}
            }
        }
    }

    merged.merged = true;
    merged.is_duplicate = false;

    let lines = contributions.note_lines();
    if !lines.is_empty() {
        let notes = match anchor.non_blank(field::NOTES) {
            Some(existing) => format!("{}\n{}", existing, lines.join("\n")),
            None => lines.join("\n"),
        };
        merged.set(field::NOTES, notes);
    }

    debug!(
        "Merged {} records into record {} ({} fields with contributions)",
        records.len(),
        merged.id,
        lines.len()
    );
    Ok(merged)
}
