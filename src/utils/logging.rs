// src/utils/logging.rs - Logging helpers for duplicate detection runs
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::models::{MatchRule, ScopeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupeOperation {
    Find,
    Merge,
    Import,
    ExactCleanup,
    FlaggedCleanup,
}

impl DedupeOperation {
    fn label(&self) -> (&'static str, &'static str) {
        match self {
            DedupeOperation::Find => ("FIND", "🔍"),
            DedupeOperation::Merge => ("MERGE", "🔗"),
            DedupeOperation::Import => ("IMPORT", "📥"),
            DedupeOperation::ExactCleanup => ("EXACT", "🧹"),
            DedupeOperation::FlaggedCleanup => ("FLAGGED", "🗑️"),
        }
    }
}

#[derive(Clone)]
pub struct DedupeLogger {
    op_name: &'static str,
    op_emoji: &'static str,
    start_time: Instant,
}

impl DedupeLogger {
    pub fn new(operation: DedupeOperation) -> Self {
        let (op_name, op_emoji) = operation.label();
        Self {
            op_name,
            op_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, scope: ScopeId, run_id: Option<&str>) {
        match run_id {
            Some(run_id) => info!(
                "[{}] {} 🚀 Starting {} for database {} (run ID: {})",
                self.op_name,
                self.op_emoji,
                self.op_name.to_lowercase(),
                scope,
                run_id
            ),
            None => info!(
                "[{}] {} 🚀 Starting {} for database {}",
                self.op_name,
                self.op_emoji,
                self.op_name.to_lowercase(),
                scope
            ),
        }
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.op_name, self.op_emoji, phase, details, elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.op_name, self.op_emoji, phase, elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_data_loaded(&self, count: usize) {
        info!(
            "[{}] {} 📊 Loaded {} records from store",
            self.op_name, self.op_emoji, count
        );
    }

    pub fn log_groups_found(&self, groups: usize, records_in_groups: usize) {
        if groups == 0 {
            info!(
                "[{}] {} ✨ No duplicate groups found",
                self.op_name, self.op_emoji
            );
        } else {
            info!(
                "[{}] {} 🎯 Found {} duplicate groups covering {} records",
                self.op_name, self.op_emoji, groups, records_in_groups
            );
        }
    }

    pub fn log_rule_breakdown(&self, rule_counts: &BTreeMap<MatchRule, usize>) {
        for (rule, count) in rule_counts {
            info!(
                "[{}] {}    {:<13} {} members",
                self.op_name, self.op_emoji, rule.as_str(), count
            );
        }
    }

    pub fn log_completion(&self, summary: &str) {
        info!(
            "[{}] {} ✅ Completed in {:.2}s: {}",
            self.op_name,
            self.op_emoji,
            self.start_time.elapsed().as_secs_f64(),
            summary
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.op_name, self.op_emoji, message);
    }

    pub fn log_debug(&self, message: &str) {
        debug!("[{}] {} {}", self.op_name, self.op_emoji, message);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}
