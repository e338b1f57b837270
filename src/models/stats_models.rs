// src/models/stats_models.rs
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::matching::{DuplicateGroup, MatchRule};
use crate::models::record::ScopeId;

/// Summary of one find/merge run over a scope.
#[derive(Debug, Clone, Serialize)]
pub struct DedupeStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub scope: ScopeId,
    pub records_scanned: usize,
    pub groups_found: usize,
    pub records_in_groups: usize,
    pub rule_counts: BTreeMap<MatchRule, usize>,
    pub groups_merged: usize,
    pub records_removed: usize,
    pub processing_time: f64,
}

impl DedupeStats {
    pub fn new(run_id: String, run_timestamp: NaiveDateTime, scope: ScopeId) -> Self {
        Self {
            run_id,
            run_timestamp,
            scope,
            records_scanned: 0,
            groups_found: 0,
            records_in_groups: 0,
            rule_counts: BTreeMap::new(),
            groups_merged: 0,
            records_removed: 0,
            processing_time: 0.0,
        }
    }

    pub fn record_groups(&mut self, groups: &[DuplicateGroup]) {
        self.groups_found += groups.len();
        for group in groups {
            self.records_in_groups += group.len();
            for rule in group.matched_by() {
                *self.rule_counts.entry(*rule).or_insert(0) += 1;
            }
        }
    }

    pub fn avg_group_size(&self) -> f64 {
        if self.groups_found == 0 {
            0.0
        } else {
            self.records_in_groups as f64 / self.groups_found as f64
        }
    }
}

/// Outcome of an import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub duplicates: usize,
}
